use mica_config::{BACKEND_POSTGRES, Postgres};
use mica_service::Surface;
use mica_storage::{db::Db, queries};
use mica_testkit::TestDatabase;

#[tokio::test]
#[ignore = "Requires external Postgres. Set MICA_PG_DSN to run."]
async fn postgres_and_snapshot_backends_list_the_same_records() {
	let Some(base_dsn) = mica_testkit::env_dsn() else {
		eprintln!("Skipping postgres_and_snapshot_backends_list_the_same_records; set MICA_PG_DSN.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let mut cfg = super::test_config();

	cfg.storage.backend = BACKEND_POSTGRES.to_string();
	cfg.storage.postgres = Some(Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 });

	let store = mica_service::open_store(&cfg).await.expect("Failed to open Postgres store.");
	let db = Db::connect(cfg.storage.postgres.as_ref().expect("Postgres config is set."))
		.await
		.expect("Failed to connect to Postgres.");

	queries::replace_catalog(&db, &super::sample_snapshot())
		.await
		.expect("Failed to load sample catalog.");

	let postgres = super::build_service(cfg, store);
	let snapshot = super::sample_service();
	let cases = [
		(Surface::Protocols, vec![("technique", "two-photon")]),
		(Surface::Protocols, vec![("search", "locomotion rig")]),
		(Surface::Protocols, vec![("ids", "103,301")]),
		(Surface::Papers, vec![("citations_min", "50")]),
		(Surface::Papers, vec![("has_protocols", "1"), ("orderby", "year")]),
		(Surface::Papers, vec![("search", "melanogaster")]),
		(Surface::Tools, vec![("software", "napari")]),
	];

	for (surface, pairs) in cases {
		let from_postgres = postgres
			.search(surface, super::params(&pairs))
			.await
			.expect("Postgres search failed.");
		let from_snapshot = snapshot
			.search(surface, super::params(&pairs))
			.await
			.expect("Snapshot search failed.");

		assert_eq!(from_postgres.records, from_snapshot.records, "{surface:?} {pairs:?}");
	}

	let facets = postgres
		.facet(Surface::Protocols, "technique", super::params(&[("technique", "two-photon")]))
		.await
		.expect("Postgres facet failed.");

	assert_eq!(
		facets.counts.iter().map(|count| count.count).collect::<Vec<_>>(),
		vec![3, 3, 0, 0]
	);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
