use configs::ServiceKind;

fn main() -> std::process::ExitCode {
    server::launch::launch(ServiceKind::UserDirectory)
}
