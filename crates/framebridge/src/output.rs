use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use framebridge_view::{Element, Overlay, Sizing};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct OverlayOutput<'a> {
    url: &'a str,
    origin: &'a str,
    sizing: &'a Sizing,
    fullscreen: bool,
    container: &'a Element,
    wrapper: &'a Element,
    frame: &'a Element,
    close_button: &'a Element,
    html: String,
}

pub fn print_overlay(url: &str, origin: &str, sizing: &Sizing, overlay: &Overlay, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = OverlayOutput {
                url,
                origin,
                sizing,
                fullscreen: sizing.is_fullscreen(),
                container: &overlay.container,
                wrapper: &overlay.wrapper,
                frame: &overlay.frame,
                close_button: &overlay.close_button,
                html: overlay.to_html(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NODE", "TAG", "STYLE"]);
            for (name, element) in [
                ("container", &overlay.container),
                ("wrapper", &overlay.wrapper),
                ("frame", &overlay.frame),
                ("close", &overlay.close_button),
            ] {
                table.add_row(vec![
                    name.to_string(),
                    element.tag().as_str().to_string(),
                    element.style_attribute(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}", overlay.to_html());
        }
    }
}

/// One replayed event and what the messenger did with it.
#[derive(Debug, Serialize)]
pub struct ReplayRow {
    pub line: usize,
    pub origin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub receipt: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

pub fn print_replay(rows: &[ReplayRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for row in rows {
                println!(
                    "{}",
                    serde_json::to_string(row).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["LINE", "ORIGIN", "KIND", "RECEIPT", "DETAIL"]);
            for row in rows {
                table.add_row(vec![
                    row.line.to_string(),
                    row.origin.clone(),
                    row.kind.clone().unwrap_or_default(),
                    row.receipt.to_string(),
                    row.detail.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!(
                    "line={} origin={} kind={} receipt={}{}",
                    row.line,
                    row.origin,
                    row.kind.as_deref().unwrap_or("-"),
                    row.receipt,
                    row.detail
                        .as_deref()
                        .map(|detail| format!(" detail={detail}"))
                        .unwrap_or_default()
                );
            }
        }
    }
}
