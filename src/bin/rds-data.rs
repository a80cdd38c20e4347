use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rds_data_middleware::prelude::*;
use serde_json::{Value as JsonValue, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

/// Run one SQL statement through a Data API endpoint and print the result.
///
/// Target settings not given on the command line are read from the
/// `RDS_DATA_API_CLIENT_*` environment variables.
#[derive(Parser, Debug)]
#[command(author, version, about = "Run SQL through the RDS Data API")]
struct Args {
    /// SQL text, sent verbatim
    sql: String,
    /// Named parameter as NAME=VALUE; VALUE is read as a JSON scalar, else as text
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, ParamValue)>,
    #[arg(long)]
    resource_arn: Option<String>,
    #[arg(long)]
    secret_arn: Option<String>,
    #[arg(long)]
    database: Option<String>,
    #[arg(long)]
    schema: Option<String>,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    endpoint: Option<String>,
    /// Run the statement inside a transaction and roll it back afterwards
    #[arg(long)]
    dry_run: bool,
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

fn parse_param(raw: &str) -> Result<(String, ParamValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let value = match serde_json::from_str::<JsonValue>(value) {
        Ok(json) if !json.is_array() && !json.is_object() => ParamValue::Json(json),
        _ => ParamValue::Text(value.to_owned()),
    };
    Ok((name.trim_start_matches(':').to_owned(), value))
}

fn options(args: &Args) -> Result<RdsDataOptions, RdsDataError> {
    let mut opts = match (&args.resource_arn, &args.secret_arn, &args.database) {
        (Some(resource), Some(secret), Some(database)) => {
            RdsDataOptions::new(resource.clone(), secret.clone(), database.clone())
        }
        _ => {
            let mut opts = RdsDataOptions::from_env()?;
            if let Some(resource) = &args.resource_arn {
                opts.resource_arn.clone_from(resource);
            }
            if let Some(secret) = &args.secret_arn {
                opts.secret_arn.clone_from(secret);
            }
            if let Some(database) = &args.database {
                opts.database.clone_from(database);
            }
            opts
        }
    };
    if args.schema.is_some() {
        opts.schema.clone_from(&args.schema);
    }
    if args.region.is_some() {
        opts.region.clone_from(&args.region);
    }
    if args.endpoint.is_some() {
        opts.endpoint.clone_from(&args.endpoint);
    }
    Ok(opts)
}

async fn run(args: Args) -> Result<ResultSet, RdsDataError> {
    let client = RdsDataClient::connect(options(&args)?)?;
    let params: Params = args.params.iter().cloned().collect();

    if !args.dry_run {
        return client.execute(&args.sql, Some(&params), None).await;
    }

    let tx = client.transaction().await?;
    let result = client.execute(&args.sql, Some(&params), Some(&tx)).await;
    let status = client.rollback(&tx).await?;
    tracing::info!(%status, "dry run rolled back");
    result
}

fn print_json(rs: &ResultSet) {
    let columns: Vec<JsonValue> = rs
        .columns()
        .iter()
        .map(|c| json!({"name": c.name, "tableName": c.table_name, "type": c.type_name}))
        .collect();
    let data: Vec<JsonValue> = rs.data.iter().map(Row::to_json).collect();
    let out = json!({
        "columns": columns,
        "data": data,
        "numberOfRecordsUpdated": rs.number_of_records_updated,
        "insertId": rs.insert_id,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&out).unwrap_or_else(|_| out.to_string())
    );
}

fn print_table(rs: &ResultSet) {
    if !rs.columns().is_empty() {
        let header: Vec<&str> = rs.columns().iter().map(|c| c.name.as_str()).collect();
        println!("{}", header.join("\t"));
        for row in &rs.data {
            let cells: Vec<String> = row
                .iter()
                .map(|(_, value)| match value.to_json() {
                    JsonValue::Null => "NULL".to_string(),
                    JsonValue::String(s) => s,
                    other => other.to_string(),
                })
                .collect();
            println!("{}", cells.join("\t"));
        }
    }
    println!(
        "-- {} row(s), {} updated, insert id {}",
        rs.len(),
        rs.number_of_records_updated,
        rs.insert_id
    );
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let format = args.format;
    match run(args).await {
        Ok(rs) => {
            match format {
                OutputFormat::Json => print_json(&rs),
                OutputFormat::Table => print_table(&rs),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
