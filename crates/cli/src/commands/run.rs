//! `run` command implementation.

use anyhow::{Context, Result};
use std::io::{self, Read, Write};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use config_loader::ConfigLoader;
use contracts::{OutputConfig, OutputKind, TeeConfig};
use fanout::FanoutSink;

use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_tee(args: &RunArgs) -> Result<()> {
    let config = resolve_config(args)?;

    info!(
        outputs = config.outputs.len(),
        append = config.append,
        buffer_size = config.buffer_size,
        ignore_interrupts = config.ignore_interrupts,
        "Configuration resolved"
    );

    if args.dry_run {
        print_outputs(&config);
        return Ok(());
    }

    let sink = Arc::new(
        fanout::create_sink(&config.outputs, config.append).context("Failed to open outputs")?,
    );

    // Runtime shutdown waits for spawn_blocking tasks, and a stdin read may
    // block forever, so the copy loop gets its own thread.
    let (done_tx, done_rx) = oneshot::channel();
    let copy_sink = Arc::clone(&sink);
    let buffer_size = config.buffer_size;
    std::thread::Builder::new()
        .name("tee-copy".to_string())
        .spawn(move || {
            let result = copy_stream(io::stdin().lock(), &copy_sink, buffer_size);
            let _ = done_tx.send(result);
        })
        .context("Failed to spawn copy thread")?;

    let outcome = tokio::select! {
        result = done_rx => result.context("Copy thread exited without a result")?,
        _ = shutdown_signal(config.ignore_interrupts) => {
            Err(anyhow::anyhow!("Interrupted"))
        }
    };

    io::stdout().flush().context("Failed to flush stdout")?;

    info!(metrics = %sink.metrics().snapshot(), "Tee finished");

    let bytes = outcome?;
    debug!(bytes, "Input exhausted");
    Ok(())
}

/// Merge the optional config file with command-line arguments
fn resolve_config(args: &RunArgs) -> Result<TeeConfig> {
    let mut config = match args.config {
        Some(ref path) => ConfigLoader::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => TeeConfig::default(),
    };

    config.append |= args.append;
    config.ignore_interrupts |= args.ignore_interrupts;
    if let Some(buffer_size) = args.buffer_size {
        config.buffer_size = buffer_size;
    }

    let has_stdout = config
        .outputs
        .iter()
        .any(|output| output.kind == OutputKind::Stdout);
    if !args.no_stdout && !has_stdout {
        config.outputs.insert(0, OutputConfig::stdout());
    }

    let append = config.append;
    config
        .outputs
        .extend(args.files.iter().map(|path| OutputConfig::file(path, append)));

    ConfigLoader::validate(&config).context("Invalid output configuration")?;
    Ok(config)
}

/// Copy `reader` into `sink` chunk by chunk until EOF
///
/// Returns the number of bytes copied. Stops at the first failing output.
pub(crate) fn copy_stream<R: Read>(
    mut reader: R,
    sink: &FanoutSink,
    buffer_size: usize,
) -> Result<u64> {
    let mut buf = vec![0u8; buffer_size];
    let mut total: u64 = 0;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        sink.write(&buf[..n])
            .with_context(|| format!("Failed to write chunk at offset {total}"))?;
        total += n as u64;
    }

    Ok(total)
}

/// Resolve on Ctrl+C (unless ignored) or SIGTERM
async fn shutdown_signal(ignore_interrupts: bool) {
    let ctrl_c = async {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
            if !ignore_interrupts {
                break;
            }
            warn!("Interrupt ignored");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print resolved outputs for dry-run mode
fn print_outputs(config: &TeeConfig) {
    println!("\n=== Outputs ({}) ===\n", config.outputs.len());
    for output in &config.outputs {
        match output.path {
            Some(ref path) => {
                let append = output.append.unwrap_or(config.append);
                let mode = if append { "append" } else { "truncate" };
                println!("  - {} ({:?}, {}, {})", output.name, output.kind, path.display(), mode);
            }
            None => println!("  - {} ({:?})", output.name, output.kind),
        }
    }
    println!("\nBuffer size: {} bytes", config.buffer_size);
    println!();
}
