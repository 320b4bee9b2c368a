//! Client subcommands: `health`, `list`, `track` and `add`.
//!
//! Each command drives a [`TrackerProxy`] over HTTP, prints its result on
//! stdout and replays the proxy's notifications on stderr. Any outcome other
//! than success exits with status 1.

use std::process;

use verifarm_client::{
    AddOutcome, ApiClient, Notification, ProductApi, TrackOutcome, TrackerProxy,
};

use crate::{report_error, OutputFormat};

/// Values given to `verifarm add`.
pub(crate) struct AddArgs {
    pub(crate) name: String,
    pub(crate) farm: String,
    pub(crate) harvest_date: String,
}

/// `--api-url`, then `VERIFARM_API_URL`, then the client default.
fn resolve_api_url(flag: Option<&str>) -> Option<String> {
    flag.map(str::to_string).or_else(|| {
        std::env::var("VERIFARM_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
    })
}

fn connect(api_url: Option<&str>) -> TrackerProxy<ApiClient> {
    let url = resolve_api_url(api_url);
    let client = ApiClient::new(url.as_deref());
    tracing::debug!(base_url = client.base_url(), "using registry API");
    TrackerProxy::new(client)
}

/// Print and clear the proxy's notifications.
fn flush_notifications(proxy: &mut TrackerProxy<ApiClient>, output: OutputFormat, quiet: bool) {
    let notes: Vec<Notification> = proxy.view_mut().notifications.drain();
    if quiet {
        return;
    }
    for note in notes {
        match output {
            OutputFormat::Text => eprintln!("[{}] {}", note.kind, note.message),
            OutputFormat::Json => eprintln!(
                "{}",
                serde_json::json!({ "notification": note.kind.as_str(), "message": note.message })
            ),
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("error: failed to serialize output: {}", e);
            process::exit(1);
        }
    }
}

pub(crate) fn cmd_health(api_url: Option<&str>, output: OutputFormat, quiet: bool) {
    let proxy = connect(api_url);
    match proxy.api().health() {
        Ok(health) => match output {
            OutputFormat::Text => println!("{}: {}", health.status, health.message),
            OutputFormat::Json => print_json(&health),
        },
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn cmd_list(api_url: Option<&str>, output: OutputFormat, quiet: bool) {
    let mut proxy = connect(api_url);
    if let Err(e) = proxy.initialize() {
        report_error(&format!("error: {}", e), output, quiet);
        process::exit(1);
    }

    let products = proxy.cache().all();
    match output {
        OutputFormat::Json => print_json(&products),
        OutputFormat::Text => {
            if products.is_empty() {
                if !quiet {
                    eprintln!("no products registered");
                }
                return;
            }
            println!(
                "{:<10} {:<24} {:<24} {:<10} LOCATION",
                "ID", "NAME", "FARM", "STATUS"
            );
            for p in products {
                println!(
                    "{:<10} {:<24} {:<24} {:<10} {}",
                    p.id, p.name, p.farm, p.status, p.current_location
                );
            }
        }
    }
}

pub(crate) fn cmd_track(
    api_url: Option<&str>,
    id: &str,
    html: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let mut proxy = connect(api_url);
    proxy.view_mut().form.product_id = id.to_string();

    let outcome = proxy.track();
    if let TrackOutcome::Found(product) = &outcome {
        match output {
            OutputFormat::Json => print_json(product),
            OutputFormat::Text if html => print!("{}", proxy.view().render_html()),
            OutputFormat::Text => print!("{}", proxy.view().render_text()),
        }
    }
    flush_notifications(&mut proxy, output, quiet);

    match outcome {
        TrackOutcome::Found(_) => {}
        TrackOutcome::Unavailable(e) => {
            tracing::debug!(error = %e, "track failed");
            process::exit(1);
        }
        TrackOutcome::EmptyInput | TrackOutcome::NotFound => process::exit(1),
    }
}

pub(crate) fn cmd_add(api_url: Option<&str>, args: AddArgs, output: OutputFormat, quiet: bool) {
    let mut proxy = connect(api_url);
    {
        let form = &mut proxy.view_mut().form;
        form.name = args.name;
        form.farm = args.farm;
        form.harvest_date = args.harvest_date;
    }

    let outcome = proxy.add();
    if let AddOutcome::Added(product) = &outcome {
        match output {
            OutputFormat::Json => print_json(product),
            OutputFormat::Text => println!("{}", product.id),
        }
    }
    flush_notifications(&mut proxy, output, quiet);

    match outcome {
        AddOutcome::Added(_) => {}
        AddOutcome::Invalid => process::exit(1),
        AddOutcome::Failed(e) => {
            tracing::debug!(error = %e, "add failed");
            process::exit(1);
        }
    }
}
