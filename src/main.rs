use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{error, info, warn};

use wave_packet_guard::envelope::{default_packet_width, hilbert_envelope};
use wave_packet_guard::make_waves::{sample_packet, Window};
use wave_packet_guard::periodicity::{compute, WaveSumSpec};
use wave_packet_guard::beats::beats_window;
use wave_packet_guard::presets::{BeatsBook, PresetBook};
use wave_packet_guard::uncertainty::{sweep_packets, SweepConfig, UncertaintyFigures};
use wave_packet_guard::utils::{to_millis, DEFAULT_DURATION};

/// Repetition period and safe plotting window for a wave packet.
#[derive(Parser, Debug)]
#[command(name = "wave_packet_guard", version)]
struct Args {
    /// Named packet configuration (see --list-presets)
    #[arg(long, conflicts_with_all = ["n_waves", "f_min", "f_max"])]
    preset: Option<String>,

    /// Number of summed waves
    #[arg(long, requires_all = ["f_min", "f_max"])]
    n_waves: Option<usize>,

    /// Lowest component frequency (Hz)
    #[arg(long)]
    f_min: Option<f64>,

    /// Highest component frequency (Hz)
    #[arg(long)]
    f_max: Option<f64>,

    /// Requested plot duration (s)
    #[arg(long, default_value_t = DEFAULT_DURATION)]
    duration: f64,

    /// Measure the packet width on the sampled envelope
    #[arg(long)]
    measure: bool,

    /// Plot window for two beating tones F1 F2 (Hz), then exit
    #[arg(long, num_args = 2, value_names = ["F1", "F2"])]
    beats: Option<Vec<f64>>,

    /// Plot window for a named beats preset, then exit
    #[arg(long, conflicts_with = "beats")]
    beats_preset: Option<String>,

    /// Run the multi-packet Δx·Δk sweep with this many packets, then exit
    #[arg(long, value_name = "PACKETS")]
    sweep: Option<usize>,

    /// Print the preset names and exit
    #[arg(long)]
    list_presets: bool,

    /// Print the preset table as YAML and exit
    #[arg(long)]
    dump_presets: bool,

    /// Print log output (honours RUST_LOG when set)
    #[arg(long)]
    enable_logs: bool,
}

fn main() {
    let args = Args::parse();

    // Set up proper logging filters
    if args.enable_logs {
        // Don't override RUST_LOG if it's already set
        if std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", "wave_packet_guard=info");
        }
        env_logger::init();
    }

    if let Err(e) = run(&args) {
        if args.enable_logs {
            error!("Application encountered an error: {:?}", e);
        } else {
            eprintln!("Error: {:?}", e);
        }
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let book = PresetBook::builtin();

    let beats_book = BeatsBook::builtin();

    if args.list_presets {
        for name in book.names() {
            let preset = book.get(name)?;
            println!("{} ({:.0}-{:.0} Hz, N={}): {}",
                     name, preset.f_min, preset.f_max, preset.n_waves, preset.description);
        }
        for name in beats_book.names() {
            let preset = beats_book.get(name)?;
            println!("[beats] {} ({:.1} + {:.1} Hz): {}",
                     name, preset.f1, preset.f2, preset.description);
        }
        return Ok(());
    }
    if args.dump_presets {
        print!("{}", book.to_yaml()?);
        print!("{}", beats_book.to_yaml()?);
        return Ok(());
    }

    let tones = match (&args.beats, &args.beats_preset) {
        (Some(pair), _) => Some((pair[0], pair[1])),
        (None, Some(name)) => {
            let preset = beats_book.get(name)?;
            Some((preset.f1, preset.f2))
        }
        (None, None) => None,
    };
    if let Some((f1, f2)) = tones {
        let window = beats_window(f1, f2);
        println!("Beats window: {:.3} s", window.duration);
        println!("{}", window.summary());
        return Ok(());
    }

    if let Some(n_packets) = args.sweep {
        let report = sweep_packets(&SweepConfig { n_packets, ..SweepConfig::default() })?;
        for row in &report.rows {
            println!("#{:<2} λ_max = {:.2} m, Δk = {:.3} rad/m, Δx = {:.3} m, Δx·Δk = {:.3} ({:.2}%)",
                     row.index, row.lambda_max, row.delta_k, row.delta_x, row.product, row.error_percent);
        }
        println!("Mean Δx·Δk = {:.3}, std = {:.3} (target 4π = 12.566)",
                 report.mean_product, report.std_product);
        return Ok(());
    }

    let spec = build_spec(args, &book)?;
    info!("Packet: N={}, {:.1}-{:.1} Hz, requested {:.3}s",
          spec.n_waves, spec.f_min, spec.f_max, spec.requested_duration);

    let guard = compute(spec).context("Invalid packet parameters")?;
    println!("Repetition period: {:.2} ms", to_millis(guard.repetition_period));
    println!("Effective duration: {:.2} ms", to_millis(guard.effective_duration));
    if let Some(notice) = guard.notice() {
        warn!("{}", notice);
        println!("Warning: {}", notice);
    }

    let figures = UncertaintyFigures::in_air(spec.f_min, spec.f_max);
    println!("Δk = {:.4} rad/m, Δx = {:.3} m, Δx·Δk = {:.3}",
             figures.delta_k, figures.delta_x, figures.space_product());
    println!("Δω = {:.1} rad/s, Δt = {:.2} ms, Δω·Δt = {:.3}",
             figures.delta_omega, to_millis(figures.delta_t), figures.time_product());

    if args.measure {
        let packet = sample_packet(&spec, Window::Symmetric)?;
        let envelope = hilbert_envelope(&packet.samples)?;
        let width = default_packet_width(&packet.times, &envelope);
        let measured = width.width * figures.delta_omega;
        println!("Measured Δt = {:.2} ms, Δω·Δt = {:.3} ({:.1}% from 4π)",
                 to_millis(width.width), measured,
                 UncertaintyFigures::product_error_percent(measured));
    }

    Ok(())
}

fn build_spec(args: &Args, book: &PresetBook) -> Result<WaveSumSpec> {
    if let Some(name) = &args.preset {
        let preset = book.get(name)?;
        return Ok(preset.with_duration(args.duration));
    }

    match (args.n_waves, args.f_min, args.f_max) {
        (Some(n_waves), Some(f_min), Some(f_max)) => {
            Ok(WaveSumSpec::new(n_waves, f_min, f_max, args.duration))
        }
        (None, None, None) => {
            let preset = book.get(wave_packet_guard::presets::DEFAULT_PRESET)?;
            info!("No parameters given, using the default preset");
            Ok(preset.with_duration(args.duration))
        }
        _ => Err(anyhow!("--n-waves, --f-min and --f-max must be given together")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_packet_guard::presets::DEFAULT_PRESET;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("wave_packet_guard").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_parameters_fall_back_to_default_preset() {
        let book = PresetBook::builtin();
        let spec = build_spec(&parse(&[]), &book).unwrap();
        assert_eq!(spec, book.get(DEFAULT_PRESET).unwrap().with_duration(DEFAULT_DURATION));
    }

    #[test]
    fn explicit_parameters_build_the_spec() {
        let args = parse(&["--n-waves", "80", "--f-min", "100", "--f-max", "200", "--duration", "2"]);
        let spec = build_spec(&args, &PresetBook::builtin()).unwrap();
        assert_eq!(spec, WaveSumSpec::new(80, 100.0, 200.0, 2.0));
    }

    #[test]
    fn partial_parameters_are_rejected() {
        let args = parse(&["--f-min", "100", "--f-max", "200"]);
        let err = build_spec(&args, &PresetBook::builtin()).unwrap_err();
        assert!(err.to_string().contains("must be given together"));
    }

    #[test]
    fn beats_flag_takes_two_frequencies() {
        let args = parse(&["--beats", "440", "442"]);
        assert_eq!(args.beats, Some(vec![440.0, 442.0]));
        assert!(Args::try_parse_from(["wave_packet_guard", "--beats", "440"]).is_err());
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let args = parse(&["--preset", "nope"]);
        assert!(build_spec(&args, &PresetBook::builtin()).is_err());
    }
}
