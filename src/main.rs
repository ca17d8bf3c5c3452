use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    callback_notifier::run(std::env::args_os()).await
}
