use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = mica_api::Args::parse();

	mica_api::run(args).await
}
