use std::io::Write;
use std::sync::Arc;

use atto_core::{
	interpreter::corelib_table,
	parser::prelude::parse,
	utils::prelude::{Error, Source},
};

const PROMPT: &str = ">> ";

pub fn start() -> std::io::Result<()> {
	let stdin = std::io::stdin();

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;
		if stdin.read_line(&mut input)? == 0 {
			return Ok(());
		}

		if let Some('\n') = input.chars().next_back() {
			input.pop();
		}
		if let Some('\r') = input.chars().next_back() {
			input.pop();
		}

		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				let src = Source::new("<rppl>", input.clone());

				match parse(&src, corelib_table().clone()) {
					Ok(funcs) => {
						// only show what this line defined, not the corelib
						let mut defined = funcs.values()
							.filter(|func| Arc::ptr_eq(&func.name.src, &src))
							.collect::<Vec<_>>();
						defined.sort_by_key(|func| func.name.span.start);

						for func in defined {
							println!("{}", func);
						}
					},
					Err(error) => {
						let err = Error::Parse { src: src.clone(), error };
						print!("{}", err.pretty_string());
					}
				}
			}
		}
	}
}
