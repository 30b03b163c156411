// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use apalize::{ApalizeClient, ApalizeClientBuilder, SchemaVariant, TranslationContent};
use apalize_core::slugify;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Apalize - inspect and exercise application translations
#[derive(Parser, Debug)]
#[command(name = "apalize", version, about, long_about = None)]
struct Args {
	/// Application ID translations are fetched for
	#[arg(short, long, env = "APALIZE_APPLICATION_ID")]
	application_id: Option<String>,

	/// Base URL of the translation API
	#[arg(long, env = "APALIZE_BASE_URL")]
	base_url: Option<String>,

	/// Active locale
	#[arg(long, env = "APALIZE_LOCALE")]
	locale: Option<String>,

	/// Page or location reported alongside missing keys
	#[arg(long, env = "APALIZE_REFERRER")]
	referrer: Option<String>,

	/// Shape of reported missing keys
	#[arg(long, value_enum, default_value = "localized")]
	schema: Schema,

	/// Log level
	#[arg(short, long, default_value = "warn")]
	log_level: String,

	/// Output logs as JSON
	#[arg(long, conflicts_with = "pretty_logs")]
	json_logs: bool,

	/// Output logs in multi-line human format
	#[arg(long)]
	pretty_logs: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the normalized form of each key
	Slug {
		/// Keys to normalize
		#[arg(required = true)]
		keys: Vec<String>,
	},
	/// Load translations and resolve a single key
	Translate {
		/// Key to translate
		key: String,
		/// Placeholder value (repeatable: --var NAME=VALUE)
		#[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
		vars: Vec<(String, String)>,
		/// Text used when there is no translation
		#[arg(long)]
		default: Option<String>,
		/// Report the key immediately if it is missing
		#[arg(long)]
		report: bool,
	},
	/// Load translations and list them as `key<TAB>value`
	///
	/// Without a locale every value is listed as `key<TAB>locale<TAB>value`,
	/// with `*` for entries that apply to all locales.
	Keys {
		/// Only list values for this locale
		#[arg(long)]
		locale: Option<String>,
	},
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Schema {
	Localized,
	Scalar,
}

impl From<Schema> for SchemaVariant {
	fn from(schema: Schema) -> Self {
		match schema {
			Schema::Localized => SchemaVariant::Localized,
			Schema::Scalar => SchemaVariant::Scalar,
		}
	}
}

enum LogFormat {
	Json,
	Compact,
	Pretty,
}

fn parse_var(raw: &str) -> std::result::Result<(String, String), String> {
	let (name, value) = raw
		.split_once('=')
		.ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
	if name.is_empty() {
		return Err(format!("missing variable name in '{raw}'"));
	}
	Ok((name.to_string(), value.to_string()))
}

fn init_tracing(level: &str, format: LogFormat) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(format!("apalize={level},apalize_cli={level}")));

	match format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().pretty().with_writer(std::io::stderr))
				.init();
		}
	}
}

fn client_builder(args: &Args) -> Result<ApalizeClientBuilder> {
	let application_id = args
		.application_id
		.clone()
		.context("application ID is required (--application-id or APALIZE_APPLICATION_ID)")?;

	let mut builder = ApalizeClient::builder()
		.application_id(application_id)
		.schema(args.schema.into());
	if let Some(base_url) = &args.base_url {
		builder = builder.base_url(base_url);
	}
	if let Some(locale) = &args.locale {
		builder = builder.locale(locale);
	}
	if let Some(referrer) = &args.referrer {
		builder = builder.referrer(referrer);
	}
	Ok(builder)
}

async fn run_translate(
	args: &Args,
	key: &str,
	vars: &[(String, String)],
	default: Option<&str>,
	report: bool,
) -> Result<()> {
	let client = client_builder(args)?
		// The process exits long before a deferred report would fire.
		.report_delay(Duration::from_secs(3600))
		.identify_timeout(Duration::from_millis(500))
		.init()
		.await
		.context("failed to create translation client")?;

	let variables: HashMap<String, String> = vars.iter().cloned().collect();
	let variables = (!variables.is_empty()).then_some(&variables);

	println!("{}", client.translate(key, variables, default));

	if report {
		let sent = client
			.flush_missing()
			.await
			.context("failed to report missing translations")?;
		info!(count = sent, "Reported missing translations");
	}

	client.shutdown();
	Ok(())
}

async fn run_keys(args: &Args, locale: Option<&str>) -> Result<()> {
	let client = client_builder(args)?
		.build()
		.context("failed to create translation client")?;
	let count = client.load().await.context("failed to load translations")?;
	debug!(count, "Listing translations");

	let translations = client.translations().unwrap_or_default();
	for translation in &translations {
		match locale {
			Some(locale) => {
				if let Some(value) = translation.value_for(Some(locale)) {
					println!("{}\t{}", translation.key, value);
				}
			}
			None => match &translation.content {
				TranslationContent::Scalar { value } => {
					println!("{}\t*\t{}", translation.key, value);
				}
				TranslationContent::Localized { values } => {
					for value in values {
						println!("{}\t{}\t{}", translation.key, value.locale, value.value);
					}
				}
			},
		}
	}

	Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let format = if args.json_logs {
		LogFormat::Json
	} else if args.pretty_logs {
		LogFormat::Pretty
	} else {
		LogFormat::Compact
	};
	init_tracing(&args.log_level, format);

	match &args.command {
		Command::Slug { keys } => {
			for key in keys {
				println!("{}", slugify(key));
			}
			Ok(())
		}
		Command::Translate {
			key,
			vars,
			default,
			report,
		} => run_translate(&args, key, vars, default.as_deref(), *report).await,
		Command::Keys { locale } => run_keys(&args, locale.as_deref().or(args.locale.as_deref())).await,
	}
}
