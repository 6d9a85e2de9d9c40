use clap::{crate_authors, crate_description, crate_version, Arg, ArgAction, Command};
use pretty_env_logger::env_logger::{self, Builder};
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::exit;

use mass_mailer::campaign::{load_recipients, Config as Campaign, Recipient, Template};
use mass_mailer::common::{Mode, Result};
use mass_mailer::service::MassMailer;
use mass_mailer::Config;

const EXIT_LOAD_FAILED: i32 = 2;
const EXIT_SEND_FAILED: i32 = 3;

fn init_logger(builder: &mut Builder) {
    if env::var("RUST_LOG").is_err() {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

fn syslog_priority(level: log::Level) -> u8 {
    match level {
        log::Level::Error => 3,
        log::Level::Warn => 4,
        log::Level::Info => 6,
        log::Level::Debug | log::Level::Trace => 7,
    }
}

fn setup_logger() {
    // journald picks up the <priority> prefix.
    match env::var("RUST_LOG_STYLE") {
        Ok(style) if style == "SYSTEMD" => {
            let mut builder = env_logger::builder();
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "<{}>{}: {}",
                    syslog_priority(record.level()),
                    record.target(),
                    record.args()
                )
            });
            init_logger(&mut builder);
        }
        _ => init_logger(&mut pretty_env_logger::formatted_builder()),
    };
}

fn command() -> Command {
    Command::new("mass-mailer")
        .about(format!(
            "{}\n{} {}",
            crate_description!(),
            "Relay credentials and TLS are read from MASS_MAILER_SMTP__* environment variables.",
            "Test new campaigns with your own address first.",
        ))
        .arg(
            Arg::new("dry-run")
                .action(ArgAction::SetTrue)
                .long("dry-run")
                .help("Render every message without sending anything"),
        )
        .arg(
            Arg::new("check")
                .action(ArgAction::SetTrue)
                .short('t')
                .long("test")
                .help("Check the inputs and exit"),
        )
        .arg(
            Arg::new("fail-on-error")
                .action(ArgAction::SetTrue)
                .long("fail-on-error")
                .help("Exit with a non-zero status when any message could not be sent"),
        )
        .arg(
            Arg::new("config")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Campaign configuration, KEY=VALUE lines (config.ini)"),
        )
        .arg(
            Arg::new("template")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Message template, .txt for plain text or .html"),
        )
        .arg(
            Arg::new("recipients")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Recipients as firstname,lastname,email lines (emails.csv)"),
        )
        .version(crate_version!())
        .author(crate_authors!("\n"))
}

struct Inputs {
    settings: Config,
    campaign: Campaign,
    template: Template,
    recipients: Vec<Recipient>,
}

fn load_inputs(args: &clap::ArgMatches) -> Result<Inputs> {
    let path = |id: &str| args.get_one::<PathBuf>(id).cloned().unwrap_or_default();

    Ok(Inputs {
        settings: Config::populate_from_env()?,
        campaign: Campaign::load(&path("config"))?,
        template: Template::load(&path("template"))?,
        recipients: load_recipients(&path("recipients"))?,
    })
}

pub(crate) fn main() {
    let mut cli = command();
    let args = cli.get_matches_mut();

    setup_logger();

    let mode = Mode::from_dry_run(args.get_flag("dry-run"));
    let inputs = match load_inputs(&args).and_then(|inputs| {
        let relay = inputs
            .settings
            .relay_for_mode(inputs.campaign.smtp_relay(), mode)?;
        Ok((inputs, relay))
    }) {
        Ok(loaded) => loaded,
        Err(err) => {
            println!("Fail. An error occurred: {err}\n");
            println!("{}", cli.render_help());
            exit(EXIT_LOAD_FAILED);
        }
    };
    let (inputs, relay) = inputs;

    tracing::info!(
        smtp = inputs.campaign.smtp(),
        template = %inputs.template.kind,
        placeholders = inputs.template.placeholder_count(),
        recipients = inputs.recipients.len(),
        "Init. Configuration, email template, and emails loaded."
    );

    if args.get_flag("check") {
        exit(0);
    }

    let mailer = match relay {
        Some(relay) => MassMailer::new(inputs.campaign, inputs.template, Box::new(relay)),
        None => MassMailer::without_transport(inputs.campaign, inputs.template),
    };
    let result = mailer.dispatch(&inputs.recipients, mode);

    if args.get_flag("fail-on-error") && result.errors > 0 {
        exit(EXIT_SEND_FAILED);
    }
}
