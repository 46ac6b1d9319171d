use std::rc::Rc;

use framebridge_channel::parse_target;
use framebridge_messenger::{MessengerConfig, OpenOptions};
use framebridge_view::{ClickHandler, Overlay};

use crate::cmd::{RenderArgs, SizingArgs};
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_overlay, OutputFormat};

pub fn run(args: RenderArgs, format: OutputFormat) -> CliResult<i32> {
    let (url, origin) = parse_target(&args.url)
        .map_err(|err| CliError::new(USAGE, format!("invalid url: {err}")))?;

    let options = open_options(url.as_str(), args.sizing);
    let sizing = options.sizing(&MessengerConfig::default().default_sizing);
    let noop: ClickHandler = Rc::new(|| {});
    let overlay = Overlay::build(url.as_str(), &sizing, noop);

    print_overlay(url.as_str(), origin.as_str(), &sizing, &overlay, format);
    Ok(SUCCESS)
}

pub(crate) fn open_options(url: &str, sizing: SizingArgs) -> OpenOptions {
    OpenOptions {
        url: url.to_string(),
        width: sizing.width,
        height: sizing.height,
        top: sizing.top,
    }
}
