// ============================================================================
// retime-cli/src/commands/retime.rs
// ============================================================================
//
// CONVERSION COMMANDS: slow-down, speed-up and run
//
// The CLI plays the host: it resolves the service settings, hands the
// service a converter and waits on the returned task while listening for
// Ctrl+C.
//
// Settings precedence (later wins):
// 1. Schema defaults
// 2. The JSON settings file (--config / RETIME_CONFIG)
// 3. --set KEY=VALUE pairs
// 4. The typed shortcuts (--percent, --no-audio)

use crate::cli::{ConversionArgs, RetimeArgs, RunArgs};
use crate::error::{CliResult, EXIT_CANCELLED};

use log::{debug, info, warn};
use retime_core::external::{RecordingConverter, SidecarConverter, check_dependency};
use retime_core::services::{slow_down, speed_up};
use retime_core::utils::format_duration;
use retime_core::{
    ActionContext, ConfigSchema, ConfigStore, ConfigValue, ConversionOutcome, ConversionTask,
    CoreError, EditService, ExportOptions, FieldKind, find_service,
};
use std::io;
use std::process::ExitCode;

/// Runs the Slow Down service.
pub fn run_slow_down(args: RetimeArgs) -> CliResult<ExitCode> {
    let shortcuts = shortcut_overrides(
        &args,
        slow_down::SLOW_DOWN_PERCENT,
        slow_down::SLOW_DOWN_AUDIO,
    );
    execute(&slow_down::service(), &args.conversion, shortcuts)
}

/// Runs the Speed Up service.
pub fn run_speed_up(args: RetimeArgs) -> CliResult<ExitCode> {
    let shortcuts = shortcut_overrides(
        &args,
        speed_up::SPEED_UP_PERCENT,
        speed_up::SPEED_UP_AUDIO,
    );
    execute(&speed_up::service(), &args.conversion, shortcuts)
}

/// Runs a service looked up by slug or title.
pub fn run_service(args: RunArgs) -> CliResult<ExitCode> {
    let service = find_service(&args.service)?;
    execute(&service, &args.conversion, Vec::new())
}

fn shortcut_overrides(
    args: &RetimeArgs,
    percent_key: &str,
    audio_key: &str,
) -> Vec<(String, ConfigValue)> {
    let mut overrides = Vec::new();
    if let Some(percent) = args.percent {
        overrides.push((percent_key.to_string(), ConfigValue::Number(percent)));
    }
    if args.no_audio {
        overrides.push((audio_key.to_string(), ConfigValue::Boolean(false)));
    }
    overrides
}

/// Parses a `KEY=VALUE` pair, typing the value by the schema field it names.
pub fn parse_setting(schema: &ConfigSchema, raw: &str) -> CliResult<(String, ConfigValue)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| CoreError::Config(format!("expected KEY=VALUE, got '{raw}'")))?;
    let (key, value) = (key.trim(), value.trim());

    let field = schema.get(key).ok_or_else(|| {
        let known: Vec<_> = schema.keys().collect();
        CoreError::Config(format!(
            "unknown setting '{key}' (expected one of: {})",
            known.join(", ")
        ))
    })?;

    let parsed = match field.kind {
        FieldKind::Boolean => value.parse::<bool>().map(ConfigValue::Boolean).ok(),
        FieldKind::Number => value.parse::<f64>().map(ConfigValue::Number).ok(),
    };
    let parsed = parsed.ok_or_else(|| {
        CoreError::Config(format!("{key}: '{value}' is not a valid {}", field.kind))
    })?;
    Ok((key.to_string(), parsed))
}

/// Resolves the settings for one invocation.
pub fn resolve_config(
    service: &EditService,
    args: &ConversionArgs,
    shortcuts: Vec<(String, ConfigValue)>,
) -> CliResult<ConfigStore> {
    let mut overrides = Vec::new();
    if let Some(path) = &args.config {
        debug!("Reading settings from {}", path.display());
        overrides.extend(ConfigStore::overrides_from_json_file(path)?);
    }
    for raw in &args.settings {
        overrides.push(parse_setting(&service.config, raw)?);
    }
    overrides.extend(shortcuts);
    ConfigStore::resolve(&service.config, overrides)
}

fn execute(
    service: &EditService,
    args: &ConversionArgs,
    shortcuts: Vec<(String, ConfigValue)>,
) -> CliResult<ExitCode> {
    let config = resolve_config(service, args, shortcuts)?;
    for (key, value) in config.iter() {
        debug!("{}: {key} = {value}", service.title);
    }

    if !args.input_path.is_file() {
        return Err(CoreError::InvalidPath(format!(
            "input file not found: {}",
            args.input_path.display()
        )));
    }
    let export_options = ExportOptions {
        is_muted: args.muted,
    };

    if args.dry_run {
        return dry_run(service, &config, args, export_options);
    }

    let converter = sidecar_converter(args);
    check_dependency(converter.program())?;

    let task = service.run(&ActionContext {
        config: &config,
        converter: &converter,
        export_options,
        input_path: &args.input_path,
        output_path: &args.output_path,
    })?;

    match wait_with_interrupt(task)? {
        ConversionOutcome::Completed(output) => {
            info!(
                "{}: wrote {} ({})",
                service.title,
                output.output_path.display(),
                format_duration(output.elapsed.as_secs_f64())
            );
            Ok(ExitCode::SUCCESS)
        }
        ConversionOutcome::Cancelled => {
            warn!("{}: cancelled", service.title);
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
    }
}

/// Waits on the task from a blocking worker while Ctrl+C cancels it.
fn wait_with_interrupt(task: ConversionTask) -> CliResult<ConversionOutcome> {
    let token = task.cancel_token();
    let label = task.label().to_string();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut waiter = tokio::task::spawn_blocking(move || task.wait());
        let joined = tokio::select! {
            joined = &mut waiter => joined,
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => {
                        warn!("{label}: interrupt received, stopping ffmpeg");
                        token.cancel();
                    }
                    Err(e) => warn!("Unable to listen for Ctrl+C: {e}"),
                }
                waiter.await
            }
        };
        match joined {
            Ok(result) => result,
            Err(e) => Err(CoreError::Io(io::Error::other(e))),
        }
    })
}

fn sidecar_converter(args: &ConversionArgs) -> SidecarConverter {
    match &args.ffmpeg {
        Some(path) => SidecarConverter::with_ffmpeg_path(path),
        None => SidecarConverter::new(),
    }
}

/// Records the service's request and prints the command ffmpeg would be
/// spawned with, without spawning it.
fn dry_run(
    service: &EditService,
    config: &ConfigStore,
    args: &ConversionArgs,
    export_options: ExportOptions,
) -> CliResult<ExitCode> {
    let recorder = RecordingConverter::new();
    let task = service.run(&ActionContext {
        config,
        converter: &recorder,
        export_options,
        input_path: &args.input_path,
        output_path: &args.output_path,
    })?;
    task.wait()?;

    if let Some(request) = recorder.last_request() {
        let command_line = sidecar_converter(args).command_line(&request);
        println!("{}", format_command(&command_line));
    }
    Ok(ExitCode::SUCCESS)
}

/// Renders a program and its arguments as a copy-pasteable shell line.
pub fn format_command(command_line: &[String]) -> String {
    command_line
        .iter()
        .map(|arg| shell_quote(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
