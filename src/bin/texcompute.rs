use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "texcompute", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the adapter and transfer mode that would be used.
    Info(DeviceArgs),
    /// Run a kernel over a list of values and print the result as JSON.
    Run(RunArgs),
    /// Print the assembled fragment shader without touching the GPU.
    Shader(ShaderArgs),
}

#[derive(Parser, Debug)]
struct DeviceArgs {
    /// Device options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the transfer mode.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    device: DeviceArgs,

    /// Kernel body file (WGSL statements using `read()` / `commit()`).
    #[arg(long, conflicts_with = "body", required_unless_present = "body")]
    kernel: Option<PathBuf>,

    /// Kernel body given inline.
    #[arg(long)]
    body: Option<String>,

    /// Comma-separated input values.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, conflicts_with = "in_path")]
    values: Vec<f32>,

    /// Input JSON array of numbers.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Logical length; defaults to the number of input values.
    #[arg(long)]
    length: Option<usize>,
}

#[derive(Parser, Debug)]
struct ShaderArgs {
    /// Transfer mode the preamble is built for.
    #[arg(long, value_enum, default_value_t = ShaderMode::Native)]
    mode: ShaderMode,

    /// Kernel body file; defaults to the identity kernel.
    #[arg(long)]
    kernel: Option<PathBuf>,

    /// Validate the assembled source and report diagnostics.
    #[arg(long, default_value_t = false)]
    check: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Auto,
    Native,
    Packed,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShaderMode {
    Native,
    Packed,
}

const IDENTITY_KERNEL: &str = "commit(read());";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Run(args) => cmd_run(args),
        Command::Shader(args) => cmd_shader(args),
    }
}

fn device_options(args: &DeviceArgs) -> anyhow::Result<texcompute::DeviceOptions> {
    let opts = match &args.config {
        Some(path) => texcompute::DeviceOptions::from_path(path)?,
        None => texcompute::DeviceOptions::default(),
    };
    let mut opts = opts.with_env_overrides()?;
    if let Some(mode) = args.mode {
        opts.transfer_mode = match mode {
            ModeChoice::Auto => texcompute::TransferModePreference::Auto,
            ModeChoice::Native => texcompute::TransferModePreference::NativeFloat,
            ModeChoice::Packed => texcompute::TransferModePreference::PackedByte,
        };
    }
    Ok(opts)
}

fn cmd_info(args: DeviceArgs) -> anyhow::Result<()> {
    let engine = texcompute::Engine::new(&device_options(&args)?)?;
    let device = engine.device();
    let info = device.adapter_info();
    println!("adapter: {}", info.name);
    println!("backend: {:?}", info.backend);
    println!("transfer mode: {}", device.transfer_mode());
    println!("max texture side: {}", device.max_side());
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let body = match (&args.kernel, &args.body) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("read kernel '{}'", path.display()))?,
        (None, Some(body)) => body.clone(),
        (None, None) => anyhow::bail!("either --kernel or --body is required"),
    };

    let values: Vec<f32> = match &args.in_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read input '{}'", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parse input '{}' as a JSON number array", path.display()))?
        }
        None => args.values.clone(),
    };
    let length = args.length.unwrap_or(values.len());

    let engine = texcompute::Engine::new(&device_options(&args.device)?)?;
    let mut buf = engine.alloc(length)?;
    buf.fill_from(&values)?;
    let out = engine.run(&mut buf, &body)?;

    println!("{}", serde_json::to_string(out)?);
    Ok(())
}

fn cmd_shader(args: ShaderArgs) -> anyhow::Result<()> {
    let body = match &args.kernel {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read kernel '{}'", path.display()))?,
        None => IDENTITY_KERNEL.to_string(),
    };
    let mode = match args.mode {
        ShaderMode::Native => texcompute::TransferMode::NativeFloat,
        ShaderMode::Packed => texcompute::TransferMode::PackedByte,
    };
    let kernel = texcompute::KernelSource::assemble(mode, &body);
    print!("{}", kernel.wgsl());
    if args.check {
        texcompute::check_kernel(&kernel)?;
        eprintln!("ok: {mode} kernel compiles");
    }
    Ok(())
}
