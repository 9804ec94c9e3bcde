use std::io::Write;

use atto_core::{lexer::prelude::tokenize, utils::prelude::Source};

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
				let src = Source::new("<rlpl>", input.clone());

				match tokenize(&src) {
					Ok(tokens) => {
						for token in tokens {
							println!("{:?} `{}`", token.kind, token.text());
						}
					},
					Err(err) => {
						let details = err.details();
						let location = err.location;
						println!("[at {}] Lexical Error: {}", location.start, details.0);
						if details.1.len() > 0 {
							println!("{}", details.1.join("\n"));
						}
					}
				}
			}
		}
	}
}
