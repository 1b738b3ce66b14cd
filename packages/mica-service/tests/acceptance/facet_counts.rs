use mica_service::{Error, FacetResponse, Surface};

fn counts(response: &FacetResponse) -> Vec<(&str, u64)> {
	response.counts.iter().map(|count| (count.slug.as_str(), count.count)).collect()
}

#[tokio::test]
async fn selected_dimension_is_excluded_from_its_own_counts() {
	let service = super::sample_service();
	let params = || super::params(&[("technique", "two-photon")]);
	let technique =
		service.facet(Surface::Protocols, "technique", params()).await.expect("Facet failed.");
	let organism =
		service.facet(Surface::Protocols, "organism", params()).await.expect("Facet failed.");

	// Confocal keeps its count even though two-photon is selected.
	assert_eq!(counts(&technique), vec![
		("confocal", 3),
		("two_photon", 3),
		("light-sheet", 0),
		("cryo-em", 0),
	]);
	assert_eq!(counts(&organism), vec![("mouse", 3), ("zebrafish", 0), ("drosophila", 0)]);
	assert!(!technique.partial);
}

#[tokio::test]
async fn counts_respect_the_other_filters() {
	let service = super::sample_service();
	let response = service
		.facet(Surface::Papers, "technique", super::params(&[("citations_min", "49")]))
		.await
		.expect("Facet failed.");

	assert_eq!(counts(&response), vec![
		("confocal", 0),
		("two_photon", 2),
		("light-sheet", 1),
		("cryo-em", 0),
	]);
}

#[tokio::test]
async fn repeated_requests_hit_the_cache_until_invalidated() {
	let service = super::sample_service();
	let first = service
		.facet(Surface::Tools, "software", super::params(&[]))
		.await
		.expect("Facet failed.");
	let second = service
		.facet(Surface::Tools, "software", super::params(&[]))
		.await
		.expect("Facet failed.");

	assert!(!first.cached);
	assert!(second.cached);
	assert_eq!(first.counts, second.counts);
	assert_eq!(service.invalidate_facets().invalidated, 1);

	let third = service
		.facet(Surface::Tools, "software", super::params(&[]))
		.await
		.expect("Facet failed.");

	assert!(!third.cached);
}

#[tokio::test]
async fn unknown_dimension_is_not_found() {
	let service = super::sample_service();
	let err = service
		.facet(Surface::Papers, "journal", super::params(&[]))
		.await
		.expect_err("Expected an error.");

	assert!(matches!(err, Error::NotFound { .. }));
}
