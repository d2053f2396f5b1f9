use std::process::ExitCode;

fn main() -> ExitCode {
    match mht_chat_md::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
