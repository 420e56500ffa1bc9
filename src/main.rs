mod config;
mod error;
mod facts;
mod routes;

use std::process::ExitCode;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use config::{Config, OutputFormat};
use error::AppResult;
use facts::default_gateway::{DefaultGatewayResolver, FACT_NAME, Resolution, resolve_from_text};
use facts::{FactReport, Kernel, is_applicable};
use routes::GatewayAddress;
use routes::command::{CommandRunner, SystemCommandRunner};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    // Logs go to stderr, stdout only carries the fact
    init_logging(config.log_level);
    tracing::debug!("Loaded configuration: {:?}", config);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(config: &Config) -> AppResult<()> {
    let runner = SystemCommandRunner::new(config.timeout);
    let gateway = resolve_fact(config, &Kernel::current(), runner, tokio::io::stdin()).await?;

    let mut report = FactReport::new();
    report.insert(FACT_NAME, gateway.map(GatewayAddress::into_string));

    print!("{}", render_report(&report, config.format)?);
    Ok(())
}

/// Resolve the default gateway fact on a host running `kernel`.
///
/// With `--stdin` the routing table is read from `input` and neither the
/// kernel nor the command path is checked.
async fn resolve_fact<R, I>(
    config: &Config,
    kernel: &Kernel,
    runner: R,
    input: I,
) -> AppResult<Option<GatewayAddress>>
where
    R: CommandRunner,
    I: AsyncRead + Unpin,
{
    let resolution = if config.read_stdin {
        let routing_table = read_routing_table(input).await?;
        Some(resolve_from_text(&routing_table))
    } else if is_applicable(kernel) || config.force {
        let resolver =
            DefaultGatewayResolver::new(runner, config.ip_path.clone(), config.ip_args.clone());
        Some(resolver.resolve().await)
    } else {
        tracing::info!("{} is only provided on Linux, not {}", FACT_NAME, kernel);
        None
    };

    if let Some(resolution) = &resolution {
        tracing::debug!("{} resolution: {:?}", FACT_NAME, resolution);
    }

    Ok(resolution.and_then(Resolution::into_value))
}

// Decoded lossily like command output, so stray bytes only spoil their own line
async fn read_routing_table<I: AsyncRead + Unpin>(mut input: I) -> AppResult<String> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn render_report(report: &FactReport, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Text => Ok(report
            .get(FACT_NAME)
            .map(|value| format!("{}\n", value))
            .unwrap_or_default()),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(report)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facts::default_gateway::default_ip_args;
    use routes::command::testing::{FakeRunner, existing_executable};
    use std::path::PathBuf;
    use std::time::Duration;

    const ROUTING_TABLE: &str = "default via 10.0.0.1 dev eth0 proto dhcp metric 100 \n\
                                 10.0.0.0/24 dev eth0 proto kernel scope link src 10.0.0.5 \n";

    fn config_with(ip_path: PathBuf) -> Config {
        Config {
            ip_path,
            ip_args: default_ip_args(),
            timeout: Duration::from_secs(1),
            format: OutputFormat::Text,
            log_level: Level::WARN,
            read_stdin: false,
            force: false,
        }
    }

    fn gateway(value: Option<GatewayAddress>) -> Option<String> {
        value.map(GatewayAddress::into_string)
    }

    #[tokio::test]
    async fn test_linux_runs_command() {
        let runner = FakeRunner::with_output(ROUTING_TABLE);
        let config = config_with(existing_executable());

        let value = resolve_fact(&config, &Kernel::Linux, runner.clone(), &b""[..])
            .await
            .unwrap();
        assert_eq!(gateway(value), Some("10.0.0.1".to_string()));
        assert_eq!(runner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_non_linux_kernel_not_resolved() {
        let runner = FakeRunner::with_output(ROUTING_TABLE);
        let config = config_with(existing_executable());

        let value = resolve_fact(&config, &Kernel::Darwin, runner.clone(), &b""[..])
            .await
            .unwrap();
        assert_eq!(value, None);
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_force_overrides_kernel_check() {
        let runner = FakeRunner::with_output(ROUTING_TABLE);
        let mut config = config_with(existing_executable());
        config.force = true;

        let value = resolve_fact(&config, &Kernel::Darwin, runner.clone(), &b""[..])
            .await
            .unwrap();
        assert_eq!(gateway(value), Some("10.0.0.1".to_string()));
        assert_eq!(runner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_stdin_skips_kernel_and_command_checks() {
        let runner = FakeRunner::with_output("default via 10.9.9.9 dev eth9 metric 1");
        let mut config = config_with(PathBuf::from("/nonexistent/sbin/ip"));
        config.read_stdin = true;

        let value = resolve_fact(
            &config,
            &Kernel::Windows,
            runner.clone(),
            ROUTING_TABLE.as_bytes(),
        )
        .await
        .unwrap();
        assert_eq!(gateway(value), Some("10.0.0.1".to_string()));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_stdin_tolerates_invalid_utf8() {
        let mut config = config_with(PathBuf::from("/nonexistent/sbin/ip"));
        config.read_stdin = true;

        let input: &[u8] = b"default via 10.0.0.1 dev eth0 metric 100 \xff\n";
        let value = resolve_fact(&config, &Kernel::Linux, FakeRunner::failing(), input)
            .await
            .unwrap();
        assert_eq!(gateway(value), Some("10.0.0.1".to_string()));

        let input: &[u8] = b"\xfe\xff garbage\ndefault via 192.168.1.254 dev wlan0 metric 600\n";
        let value = resolve_fact(&config, &Kernel::Linux, FakeRunner::failing(), input)
            .await
            .unwrap();
        assert_eq!(gateway(value), Some("192.168.1.254".to_string()));
    }

    #[test]
    fn test_render_text() {
        let mut report = FactReport::new();
        report.insert(FACT_NAME, Some("10.0.0.1".to_string()));
        assert_eq!(render_report(&report, OutputFormat::Text).unwrap(), "10.0.0.1\n");

        report.insert(FACT_NAME, None);
        assert_eq!(render_report(&report, OutputFormat::Text).unwrap(), "");
    }

    #[test]
    fn test_render_json() {
        let mut report = FactReport::new();
        report.insert(FACT_NAME, Some("10.0.0.1".to_string()));

        let rendered = render_report(&report, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(json["facts"]["default_gateway"], "10.0.0.1");
        assert_eq!(json["hostname"], report.hostname.as_str());
    }
}
