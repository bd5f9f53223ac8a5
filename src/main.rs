use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;

use clap::Parser;

use camsnap::cli::{Args, Command};
use camsnap::component::CameraCapture;
use camsnap::config::Config;
use camsnap::device::list_devices;
use camsnap::term::TermGuard;
use camsnap::{event_loop, NokhwaBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let backend = Arc::new(NokhwaBackend::new());

    match args.command {
        Some(Command::ListDevices) => {
            print_devices(&*backend);
            Ok(())
        }
        None => run_preview(args, config, backend).await,
    }
}

fn print_devices(backend: &NokhwaBackend) {
    let devices = list_devices(backend);
    println!("Camera Devices:");
    if devices.is_empty() {
        println!("  (none found)");
    } else {
        for device in &devices {
            println!("  {}", device);
        }
    }
}

async fn run_preview(
    args: Args,
    config: Config,
    backend: Arc<NokhwaBackend>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut options = config.preview_options();
    if let Some(width) = args.width {
        options.width = width;
    }
    if let Some(height) = args.height {
        options.height = height;
    }

    let mut component = CameraCapture::new(backend, options);

    let mut guard = TermGuard::enter()?;

    component.initialize();

    // CLI flag wins over the config file for the initial device.
    let initial_device = args.device.or(config.camera.device);
    if let Some(id) = initial_device {
        if component.state().error_message.is_none() {
            component.select_device(&id);
        }
    }

    let output = args.output.clone();
    let result = event_loop::run(&mut component, move |url| {
        if let Some(path) = &output {
            let appended = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .and_then(|mut f| writeln!(f, "{}", url));
            if let Err(e) = appended {
                log::warn!("Failed to write capture to {}: {}", path.display(), e);
            }
        }
    })
    .await;

    component.dispose();
    guard.exit()?;

    if let Some(error) = component.error_message() {
        eprintln!("{}", error);
    }

    result
}
