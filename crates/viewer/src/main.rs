use viewer::runtime::{boot, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let config = boot::boot()?;
    let args = run::parse_args(std::env::args().skip(1))?;
    run::run(config, args).await
}
