use std::fs;

fn main() {
	// Parse reqwest version from Cargo.lock
	let reqwest_version = extract_reqwest_version().unwrap_or_else(|| "unknown".to_string());
	println!("cargo:rustc-env=REQWEST_VERSION={}", reqwest_version);
	println!("cargo:rerun-if-changed=Cargo.lock");
}

fn extract_reqwest_version() -> Option<String> {
	let cargo_lock = fs::read_to_string("Cargo.lock").ok()?;

	let mut lines = cargo_lock.lines();
	while let Some(line) = lines.next() {
		if line != "name = \"reqwest\"" {
			continue;
		}

		for next_line in lines.by_ref().take(5) {
			if let Some(version) = next_line.trim().strip_prefix("version = \"") {
				return version.strip_suffix('"').map(ToOwned::to_owned);
			}
		}
	}

	None
}
