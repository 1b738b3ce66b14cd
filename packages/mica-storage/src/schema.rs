pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_catalog_terms.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_catalog_terms.sql")),
				"tables/002_catalog_documents.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_catalog_documents.sql")),
				"tables/003_catalog_attachments.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_catalog_attachments.sql")),
				"tables/004_catalog_record_terms.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_catalog_record_terms.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use crate::schema::render_schema;

	#[test]
	fn renders_every_table() {
		let sql = render_schema();

		for table in
			["catalog_terms", "catalog_documents", "catalog_attachments", "catalog_record_terms"]
		{
			assert!(sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")), "{table}");
		}
		assert!(!sql.contains("\\ir "));
	}
}
