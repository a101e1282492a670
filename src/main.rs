use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    sheetkeep::cli::main()
}
