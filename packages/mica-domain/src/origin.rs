use regex::Regex;

pub const DEFAULT_ORIGIN_LABEL: &str = "External";

const BUILTIN_ORIGINS: &[(&str, &str)] = &[
	(r"(?i)^https?://([a-z0-9-]+\.)*protocols\.io(/|$)", "protocols.io"),
	(r"(?i)^https?://([a-z0-9-]+\.)*bio-protocol\.org(/|$)", "Bio-protocol"),
	(r"(?i)^https?://protocolexchange\.researchsquare\.com(/|$)", "Protocol Exchange"),
	(r"(?i)^https?://([a-z0-9-]+\.)*nature\.com/protocolexchange(/|$)", "Protocol Exchange"),
	(r"(?i)^https?://([a-z0-9-]+\.)*nature\.com/(nprot|articles/nprot|articles/s41596)", "Nature Protocols"),
	(r"(?i)^https?://([a-z0-9-]+\.)*jove\.com(/|$)", "JoVE"),
	(r"(?i)^https?://([a-z0-9-]+\.)*cell\.com/star-protocols(/|$)", "STAR Protocols"),
	(r"(?i)^https?://cshprotocols\.cshlp\.org(/|$)", "Cold Spring Harbor Protocols"),
	(r"(?i)^https?://([a-z0-9-]+\.)*github\.com(/|$)", "GitHub"),
	(r"(?i)^https?://([a-z0-9-]+\.)*zenodo\.org(/|$)", "Zenodo"),
	(r"(?i)^https?://([a-z0-9-]+\.)*figshare\.com(/|$)", "figshare"),
	(r"(?i)^https?://([a-z0-9-]+\.)*osf\.io(/|$)", "OSF"),
];

#[derive(Clone, Debug)]
struct OriginRule {
	pattern: Regex,
	label: String,
}

/// Ordered URL-pattern table for labelling where an embedded link points. First match wins.
#[derive(Clone, Debug)]
pub struct OriginClassifier {
	rules: Vec<OriginRule>,
}
impl OriginClassifier {
	/// Builds the table with `extra` rules ahead of the built-in ones.
	pub fn new<'a>(
		extra: impl IntoIterator<Item = (&'a str, &'a str)>,
	) -> Result<Self, regex::Error> {
		let mut rules = Vec::new();

		for (pattern, label) in extra {
			rules.push(OriginRule { pattern: Regex::new(pattern)?, label: label.to_string() });
		}
		for (pattern, label) in BUILTIN_ORIGINS {
			rules.push(OriginRule { pattern: Regex::new(pattern)?, label: label.to_string() });
		}

		Ok(Self { rules })
	}

	pub fn builtin() -> Result<Self, regex::Error> {
		Self::new(std::iter::empty())
	}

	pub fn classify(&self, url: &str) -> &str {
		let url = url.trim();

		self.rules
			.iter()
			.find(|rule| rule.pattern.is_match(url))
			.map(|rule| rule.label.as_str())
			.unwrap_or(DEFAULT_ORIGIN_LABEL)
	}
}
