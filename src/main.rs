use storefront::{
    cli::{Cli, Context, ExitOnErr},
    config::Settings,
    utils,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse_args();

    let settings = if cli.needs_settings() {
        let mut settings = Settings::new().exit_on_err("Failed to load configuration");
        cli.apply_overrides(&mut settings);
        utils::logger::init_logging(&settings.logs);
        settings
    } else {
        Settings::default()
    };

    cli.execute(&Context {
        settings: &settings,
    })
    .await;
}
