use mica_service::{SearchResponse, Surface};

fn ids(response: &SearchResponse) -> Vec<i64> {
	response.records.iter().filter_map(|record| record.id).collect()
}

#[tokio::test]
async fn citation_bound_is_inclusive() {
	let service = super::sample_service();
	let at_fifty = service
		.search(Surface::Papers, super::params(&[("citations_min", "50")]))
		.await
		.expect("Search failed.");
	let at_forty_nine = service
		.search(Surface::Papers, super::params(&[("citations_min", "49")]))
		.await
		.expect("Search failed.");

	assert_eq!(ids(&at_fifty), vec![101, 102]);
	assert_eq!(ids(&at_forty_nine), vec![101, 102, 103]);
}

#[tokio::test]
async fn tools_rank_by_stars() {
	let service = super::sample_service();
	let all = service.search(Surface::Tools, super::params(&[])).await.expect("Search failed.");
	let popular = service
		.search(Surface::Tools, super::params(&[("stars_min", "50")]))
		.await
		.expect("Search failed.");

	assert_eq!(ids(&all), vec![201, 202]);
	assert_eq!(all.records[0].rank_score, 900);
	assert_eq!(ids(&popular), vec![201]);
}

#[tokio::test]
async fn larger_lower_bound_wins() {
	let service = super::sample_service();
	let response = service
		.search(Surface::Papers, super::params(&[("citations_min", "10"), ("stars_min", "60")]))
		.await
		.expect("Search failed.");

	assert_eq!(ids(&response), vec![101]);
}

#[tokio::test]
async fn year_range_excludes_undated_and_out_of_range() {
	let service = super::sample_service();
	let response = service
		.search(Surface::Papers, super::params(&[("year_min", "2017"), ("year_max", "2020")]))
		.await
		.expect("Search failed.");

	assert_eq!(ids(&response), vec![101, 103, 105]);
}

#[tokio::test]
async fn free_text_also_matches_term_names() {
	let service = super::sample_service();
	let by_title = service
		.search(Surface::Papers, super::params(&[("search", "zebrafish")]))
		.await
		.expect("Search failed.");
	// Neither paper mentions the species; both are tagged with it.
	let by_term = service
		.search(Surface::Papers, super::params(&[("search", "melanogaster")]))
		.await
		.expect("Search failed.");

	assert_eq!(ids(&by_title), vec![102]);
	assert_eq!(ids(&by_term), vec![104, 105]);
}

#[tokio::test]
async fn free_text_reaches_embedded_link_titles() {
	let service = super::sample_service();
	let response = service
		.search(Surface::Protocols, super::params(&[("search", "locomotion rig")]))
		.await
		.expect("Search failed.");

	assert_eq!(response.total, 1);
	assert_eq!(response.records[0].title, "Head-Fixed Locomotion Rig");
}

#[tokio::test]
async fn protocol_flag_accepts_marked_or_linked_papers() {
	let service = super::sample_service();
	let response = service
		.search(Surface::Papers, super::params(&[("has_protocols", "1")]))
		.await
		.expect("Search failed.");

	assert_eq!(ids(&response), vec![101, 103, 105]);
	assert!(response.records.iter().all(|record| record.flag("has_protocols")));
}

#[tokio::test]
async fn unparsable_link_field_does_not_mark_a_paper() {
	let service = super::sample_service();
	let response = service
		.search(Surface::Papers, super::params(&[("ids", "104")]))
		.await
		.expect("Search failed.");
	let flagged = service
		.search(Surface::Papers, super::params(&[("ids", "104"), ("has_protocols", "1")]))
		.await
		.expect("Search failed.");

	assert_eq!(ids(&response), vec![104]);
	assert!(!response.records[0].flag("has_protocols"));
	assert_eq!(flagged.total, 0);
}

#[tokio::test]
async fn flags_combine_with_and() {
	let service = super::sample_service();
	let response = service
		.search(Surface::Papers, super::params(&[("has_code", "true"), ("has_figures", "yes")]))
		.await
		.expect("Search failed.");
	let untouched = service
		.search(Surface::Papers, super::params(&[("has_code", "no")]))
		.await
		.expect("Search failed.");

	assert_eq!(ids(&response), vec![101]);
	assert_eq!(untouched.total, 5);
}

#[tokio::test]
async fn explicit_ids_restrict_every_source() {
	let service = super::sample_service();
	let response = service
		.search(Surface::Protocols, super::params(&[("ids", "103, 301,junk")]))
		.await
		.expect("Search failed.");
	let titles: Vec<&str> = response.records.iter().map(|record| record.title.as_str()).collect();

	// 103 itself is not a flagged protocol; only its embedded link is listed.
	assert_eq!(titles, vec!["Acquisition Setup", "Head-Fixed Locomotion Rig"]);
}

#[tokio::test]
async fn sort_key_and_direction_follow_the_request() {
	let service = super::sample_service();
	let oldest_first = service
		.search(Surface::Papers, super::params(&[("orderby", "year"), ("order", "asc")]))
		.await
		.expect("Search failed.");
	let by_title = service
		.search(Surface::Tools, super::params(&[("orderby", "title")]))
		.await
		.expect("Search failed.");

	assert_eq!(ids(&oldest_first), vec![104, 103, 101, 105, 102]);
	assert_eq!(ids(&by_title), vec![202, 201]);
}

#[tokio::test]
async fn combined_filters_narrow_together() {
	let service = super::sample_service();
	let params = super::params(&[
		("organism", "mouse"),
		("technique", "two-photon"),
		("year_min", "2018"),
	]);
	let response = service.search(Surface::Papers, params).await.expect("Search failed.");

	assert_eq!(ids(&response), vec![101]);
}
