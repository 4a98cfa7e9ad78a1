use slothx_core::error::exit_code_of;

fn main() {
    match slothx::run_cli() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_code_of(&e));
        }
    }
}
