// Copyright 2023 The Doge Keychain Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Logging wrapper to be used throughout all crates in the workspace

use std::sync::Mutex;
use std::{panic, thread};

use backtrace::Backtrace;
use log::{error, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::{
	policy::compound::roll::fixed_window::FixedWindowRoller,
	policy::compound::trigger::size::SizeTrigger, policy::compound::CompoundPolicy,
	RollingFileAppender,
};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;

use crate::types::LoggingConfig;

lazy_static! {
	/// Flag to observe whether logging was explicitly initialised (don't output otherwise)
	static ref WAS_INIT: Mutex<bool> = Mutex::new(false);
	/// Static Logging configuration, should only be set once, before first logging call
	static ref LOGGING_CONFIG: Mutex<LoggingConfig> = Mutex::new(LoggingConfig::default());
}

const LOGGING_PATTERN: &str = "{d(%Y%m%d %H:%M:%S%.3f)} {h({l})} {M} - {m}{n}";

/// Initialize the logger with the given configuration
pub fn init_logger(config: Option<LoggingConfig>) {
	if let Some(c) = config {
		let stdout_level: LevelFilter = c.stdout_log_level.into();
		let file_level: LevelFilter = c.file_log_level.into();
		let minimum_level = std::cmp::max(stdout_level, file_level);

		let mut root = Root::builder();
		let mut appenders = vec![];

		if c.log_to_stdout {
			let stdout = ConsoleAppender::builder()
				.encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
				.build();
			root = root.appender("stdout");
			appenders.push(
				Appender::builder()
					.filter(Box::new(ThresholdFilter::new(stdout_level)))
					.build("stdout", Box::new(stdout)),
			);
		}

		if c.log_to_file {
			let size = c.log_max_size.unwrap_or(1024 * 1024 * 16);
			let roller = FixedWindowRoller::builder()
				.build(&format!("{}.{{}}.gz", c.log_file_path), c.log_max_files)
				.expect("invalid log roll pattern");
			let policy = CompoundPolicy::new(
				Box::new(SizeTrigger::new(size)),
				Box::new(roller),
			);
			let file = RollingFileAppender::builder()
				.append(c.log_file_append)
				.encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
				.build(c.log_file_path.clone(), Box::new(policy))
				.expect("unable to open log file");
			root = root.appender("file");
			appenders.push(
				Appender::builder()
					.filter(Box::new(ThresholdFilter::new(file_level)))
					.build("file", Box::new(file)),
			);
		}

		let config = Config::builder()
			.appenders(appenders)
			.build(root.build(minimum_level))
			.expect("invalid logging config");

		let mut was_init_ref = WAS_INIT.lock().unwrap();
		if log4rs::init_config(config).is_ok() {
			*was_init_ref = true;
		}

		let mut config_ref = LOGGING_CONFIG.lock().unwrap();
		*config_ref = c;

		send_panic_to_log();
	}
}

/// Initializes the logger for unit and integration tests
pub fn init_test_logger() {
	let mut was_init_ref = WAS_INIT.lock().unwrap();
	if *was_init_ref {
		return;
	}
	let stdout = ConsoleAppender::builder()
		.encoder(Box::new(PatternEncoder::new(LOGGING_PATTERN)))
		.build();
	let config = Config::builder()
		.appender(Appender::builder().build("stdout", Box::new(stdout)))
		.build(Root::builder().appender("stdout").build(LevelFilter::Debug))
		.expect("invalid test logging config");
	let _ = log4rs::init_config(config);
	*was_init_ref = true;
}

/// Hook to log panics via the logger as well as stderr, with a backtrace
/// when available.
fn send_panic_to_log() {
	panic::set_hook(Box::new(|info| {
		let backtrace = Backtrace::new();

		let thread = thread::current();
		let thread = thread.name().unwrap_or("unnamed");

		let msg = match info.payload().downcast_ref::<&'static str>() {
			Some(s) => *s,
			None => match info.payload().downcast_ref::<String>() {
				Some(s) => &**s,
				None => "Box<Any>",
			},
		};

		match info.location() {
			Some(location) => {
				error!(
					"\nthread '{}' panicked at '{}': {}:{}{:?}\n\n",
					thread,
					msg,
					location.file(),
					location.line(),
					backtrace
				);
			}
			None => error!("thread '{}' panicked at '{}'{:?}", thread, msg, backtrace),
		}
		if *WAS_INIT.lock().unwrap() {
			eprintln!("thread '{}' panicked at '{}'", thread, msg);
		}
	}));
}
