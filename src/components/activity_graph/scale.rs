//! Size scales and number formatting shared by the builder and renderer.

/// Bounded square-root scale: `clamp(sqrt(magnitude) * k, min, max)`.
///
/// Negative magnitudes are treated as zero, so the result is always within
/// `[min, max]` and non-decreasing in `magnitude`.
pub fn sqrt_radius(magnitude: f64, k: f64, min: f64, max: f64) -> f64 {
	(magnitude.max(0.0).sqrt() * k).clamp(min, max)
}

/// Share of `value` in `total` as a percentage rounded to one decimal.
pub fn percentage(value: u64, total: u64) -> f64 {
	if total == 0 {
		return 0.0;
	}
	((value as f64 / total as f64) * 1000.0).round() / 10.0
}

/// Compact count: `950`, `1.2K`, `3.4M`.
pub fn format_compact(n: u64) -> String {
	if n >= 1_000_000 {
		format!("{:.1}M", n as f64 / 1_000_000.0)
	} else if n >= 1_000 {
		format!("{:.1}K", n as f64 / 1_000.0)
	} else {
		n.to_string()
	}
}

/// Full count with thousands separators: `1,234,567`.
pub fn format_grouped(n: u64) -> String {
	let digits = n.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(c);
	}
	out
}

/// Human-readable label for a contribution category key.
pub fn contribution_label(key: &str) -> String {
	let known = match key {
		"production_code" | "productioncode" => "Production Code",
		"tests" => "Tests",
		"documentation" => "Documentation",
		"specs_config" | "specsconfig" => "Specs & Config",
		"infrastructure" => "Infrastructure",
		"styling" => "Styling",
		"build_artifacts" | "buildartifacts" => "Build Artifacts",
		"assets" => "Assets",
		"generated" => "Generated",
		"data" => "Data",
		"other" => "Other",
		_ => "",
	};
	if !known.is_empty() {
		return known.to_string();
	}
	key.split(['_', '-', ' '])
		.filter(|w| !w.is_empty())
		.map(|w| {
			let mut chars = w.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}
