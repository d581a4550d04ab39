//! Shared plumbing for the catalog services: logging setup, filesystem
//! preflight, and the small JSON envelopes every service speaks.

pub mod env;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }
}
