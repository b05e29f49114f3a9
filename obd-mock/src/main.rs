//! OBD-II mock adapter
//!
//! Usage: cargo run -p obd-mock -- [OPTIONS]
//!
//! Without `--listen`, commands are read from stdin one per line and the
//! mocked replies printed. With `--listen`, each TCP client gets its own
//! simulated adapter speaking the ELM-style line protocol.

use std::io::Write;

use clap::Parser;
use obd_protocol::ResponseFrame;
use obd_sim::{
    run_mock_device_task, MockDevice, MockDeviceConfig, MockDeviceEvent, MockResult, SimError,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "obd-mock")]
#[command(about = "Deterministic OBD-II adapter simulator")]
struct Args {
    /// JSON device configuration
    #[arg(short, long)]
    config: Option<String>,

    /// Serve the simulator over TCP at this address instead of stdin
    #[arg(short, long)]
    listen: Option<String>,

    /// Print the decoded value next to each reply frame
    #[arg(short, long)]
    decode: bool,
}

#[tokio::main]
async fn main() -> Result<(), SimError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "obd_mock=info,obd_protocol=info,obd_sim=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MockDeviceConfig::load(path)?,
        None => MockDeviceConfig::default(),
    };

    match &args.listen {
        Some(addr) => serve(addr, config).await,
        None => run_stdin(config, args.decode).await,
    }
}

/// Answer commands typed on stdin until EOF
async fn run_stdin(config: MockDeviceConfig, decode: bool) -> Result<(), SimError> {
    let mut device = MockDevice::from_config(config);
    info!("Mock device {} reading commands from stdin", device.id());

    let stdin = BufReader::new(tokio::io::stdin());
    run_lines(stdin, &mut device, decode, &mut std::io::stdout()).await
}

/// Answer one command per line of `reader`, printing each result to `out`
async fn run_lines<R, W>(
    reader: R,
    device: &mut MockDevice,
    decode: bool,
    out: &mut W,
) -> Result<(), SimError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        print_result(out, &device.run(command), decode)?;
    }
    out.flush()?;
    Ok(())
}

fn print_result<W: Write>(out: &mut W, result: &MockResult, decode: bool) -> std::io::Result<()> {
    writeln!(out, "{}", result.format_overview())?;
    if let Some(e) = result.error() {
        writeln!(out, "ERROR: {}", e)?;
    }
    for output in result.outputs() {
        match ResponseFrame::parse(output).ok().filter(|_| decode) {
            Some(frame) => writeln!(out, "{}    {}", output, describe(&frame))?,
            None => writeln!(out, "{}", output)?,
        }
    }
    Ok(())
}

fn describe(frame: &ResponseFrame) -> String {
    let pid = frame.pid();
    if let Some(value) = frame.value() {
        return format!("{}: {:.2} {}", pid.name(), value, pid.unit());
    }
    match pid.supported_pids(frame.data()) {
        Some(pids) => {
            let list: Vec<String> = pids.iter().map(|p| format!("{:02X}", p)).collect();
            format!("{}: {}", pid.name(), list.join(" "))
        }
        None => pid.name().to_string(),
    }
}

/// Accept TCP clients, each served by its own mock device task
async fn serve(addr: &str, config: MockDeviceConfig) -> Result<(), SimError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Mock device listening on {}", listener.local_addr()?);

    let (event_tx, mut event_rx) = broadcast::channel::<MockDeviceEvent>(256);
    tokio::spawn(async move {
        loop {
            match event_rx.recv().await {
                Ok(MockDeviceEvent::CommandServed(result)) => {
                    info!("RX: {} TX: {:?}", result.input(), result.outputs());
                }
                Ok(MockDeviceEvent::WaveformReset) => info!("Waveform reset"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Event log skipped {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    loop {
        let (stream, peer) = listener.accept().await?;
        info!("Client connected: {}", peer);

        let device = MockDevice::from_config(config.clone());
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            // Held for the lifetime of the connection; dropping it ends the task
            let (_cmd_tx, cmd_rx) = mpsc::channel(8);
            if let Err(e) = run_mock_device_task(stream, device, cmd_rx, event_tx).await {
                warn!("Client {} ended with error: {}", peer, e);
            }
            info!("Client disconnected: {}", peer);
        });
    }
}
