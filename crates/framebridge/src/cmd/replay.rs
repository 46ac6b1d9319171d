use std::cell::RefCell;
use std::rc::Rc;

use framebridge_channel::{LocalChannel, MessageEvent, Origin};
use framebridge_messenger::{Discard, Dispatch, Messenger, MessengerError, RawMessage, Receipt};
use framebridge_schema::SchemaRegistry;
use framebridge_view::VirtualDocument;
use serde_json::Value;

use crate::cmd::render::open_options;
use crate::cmd::ReplayArgs;
use crate::exit::{
    io_error, messenger_error, schema_error, CliError, CliResult, CHANNEL_FAULT, DATA_INVALID,
    SUCCESS, USAGE,
};
use crate::output::{print_replay, OutputFormat, ReplayRow};

pub fn run(args: ReplayArgs, format: OutputFormat) -> CliResult<i32> {
    let input = std::fs::read_to_string(&args.events)
        .map_err(|err| io_error(&format!("read {}", args.events.display()), err))?;
    let events = parse_events(&input)?;

    let channel = match args.host_origin.as_deref() {
        Some(origin) => LocalChannel::with_host_origin(
            Origin::parse(origin)
                .map_err(|err| CliError::new(USAGE, format!("invalid host origin: {err}")))?,
        ),
        None => LocalChannel::new(),
    };

    let faults: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&faults);
    let mut messenger: Messenger<RawMessage, LocalChannel, VirtualDocument> =
        Messenger::new(channel, VirtualDocument::new()).with_error_callback(
            move |err: MessengerError| {
                tracing::warn!(error = %err, "session torn down");
                sink.borrow_mut().push(err.to_string());
            },
        );
    if let Some(dir) = &args.schemas {
        let registry = SchemaRegistry::from_directory(dir)
            .map_err(|err| schema_error(&format!("load schemas from {}", dir.display()), err))?;
        tracing::debug!(kinds = ?registry.kinds(), "loaded message schemas");
        messenger = messenger.with_schema_registry(registry);
    }
    for kind in &args.kinds {
        messenger.on(kind.as_str(), |msg: &RawMessage| {
            tracing::info!(kind = %msg.kind, fields = msg.fields.len(), "message delivered");
            Ok(())
        });
    }

    messenger
        .open(open_options(&args.url, args.sizing))
        .map_err(|err| messenger_error("open", err))?;

    let mut rows = Vec::with_capacity(events.len());
    let mut faulted = false;
    for (line, event) in events {
        let receipt = messenger.receive(&event);
        faulted |= receipt.closed_session();
        let detail = describe(&receipt, &faults.borrow());
        rows.push(ReplayRow {
            line,
            origin: event.origin,
            kind: event
                .data
                .get("kind")
                .and_then(Value::as_str)
                .map(str::to_string),
            receipt: receipt.label(),
            detail,
        });
    }
    messenger.close();

    print_replay(&rows, format);
    Ok(if faulted { CHANNEL_FAULT } else { SUCCESS })
}

/// Parse JSON Lines, keeping 1-based line numbers. Blank lines are skipped.
fn parse_events(input: &str) -> CliResult<Vec<(usize, MessageEvent)>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(index, text)| {
            let line = index + 1;
            serde_json::from_str::<MessageEvent>(text)
                .map(|event| (line, event))
                .map_err(|err| CliError::new(DATA_INVALID, format!("line {line}: {err}")))
        })
        .collect()
}

fn describe(receipt: &Receipt, faults: &[String]) -> Option<String> {
    match receipt {
        Receipt::Rejected(mismatch) => Some(mismatch.to_string()),
        Receipt::Faulted { .. } => faults.last().cloned(),
        Receipt::Dispatched(Dispatch::Discarded(Discard::Malformed(reason))) => {
            Some(reason.clone())
        }
        Receipt::Dispatched(Dispatch::Discarded(Discard::Unrouted(kind))) => {
            Some(format!("no handler for kind {kind:?}"))
        }
        _ => None,
    }
}
