#[cfg(test)]
mod tests {
    use crate::{
        Action, Entity, EntityKind, FileReader, FileWriter, LinesReader, PatchEngine, PrintWriter,
        Updates, Where,
    };

    const SAMPLE_LOCATOR: &str = include_str!("../../testdata/sample.locator");

    fn run(doc: &str, actions: &mut [Action]) -> (String, bool) {
        let mut reader = LinesReader::new(doc);
        let mut writer = PrintWriter::new();
        let all = PatchEngine::locator()
            .apply_actions(&mut reader, &mut writer, actions)
            .expect("pass must succeed");
        (writer.text(), all)
    }

    #[test]
    fn test_get_all_walks_every_database() {
        let mut actions = vec![Action::get_all().add_where(Where::new(EntityKind::Db))];
        let (out, all) = run(SAMPLE_LOCATOR, &mut actions);

        assert!(all);
        assert_eq!(out, SAMPLE_LOCATOR);

        let dbs = actions[0].captures();
        assert_eq!(dbs.len(), 2);
        // Attribute names come back lowercased, values byte-for-byte.
        assert_eq!(dbs[0].get("id"), Some("COMMON"));
        assert_eq!(dbs[0].get("time_series_is_composite"), Some("YES"));
        assert_eq!(dbs[1].get("id"), Some("S_ORDERS_FIX"));
        assert_eq!(dbs[1].get("symbology"), Some("FIX"));
    }

    #[test]
    fn test_paths_address_an_exact_depth() {
        // Locations sit under a db, so a one-segment path never reaches
        // them and a two-segment path does. The wrapper sections do not
        // count as depth.
        let mut actions = vec![
            Action::get_all().add_where(Where::new(EntityKind::Location)),
            Action::get_all()
                .add_where(Where::new(EntityKind::Db).with_attr("id", "COMMON"))
                .add_where(Where::new(EntityKind::Location)),
        ];
        let (out, all) = run(SAMPLE_LOCATOR, &mut actions);

        assert!(!all);
        assert_eq!(out, SAMPLE_LOCATOR);
        assert!(!actions[0].executed());
        assert!(actions[0].captures().is_empty());

        assert!(actions[1].executed());
        let locations = actions[1].captures();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].get("location"), Some("/om/data/common"));
        assert_eq!(locations[0].get("end_time"), Some("20991231000000"));
    }

    #[test]
    fn test_modify_canonicalizes_only_the_line_it_touches() {
        let mut actions = vec![
            Action::modify(Updates::new().set("end_time", "20301231000000"))
                .add_where(Where::new(EntityKind::Db).with_attr("id", "S_ORDERS_FIX"))
                .add_where(Where::new(EntityKind::Location).with_attr("location", "/om/data/orders")),
        ];
        let (out, all) = run(SAMPLE_LOCATOR, &mut actions);

        assert!(all);
        let expected = SAMPLE_LOCATOR.replace(
            "\t\t\t<LOCATION ACCESS_METHOD=\"file\" LOCATION=\"/om/data/orders\" START_TIME=\"20021230000000\" END_TIME=\"20991231000000\" />",
            "\t\t\t<LOCATION access_method=\"file\" location=\"/om/data/orders\" start_time=\"20021230000000\" end_time=\"20301231000000\" />",
        );
        assert_ne!(expected, SAMPLE_LOCATOR);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_added_database_is_addressable_on_the_next_pass() {
        let mut adds = vec![
            Action::add(Entity::new(EntityKind::Db).with_attr("id", "S_NEW_DB").with_attr("symbology", "BZX")),
        ];
        let (out, all) = run(SAMPLE_LOCATOR, &mut adds);

        assert!(all);
        assert!(out.contains("<db id=\"S_NEW_DB\" symbology=\"BZX\">\n</db>\n</DATABASES>"));

        let mut gets = vec![Action::get().add_where(Where::new(EntityKind::Db).with_attr("id", "S_NEW_DB"))];
        let (unchanged, all) = run(&out, &mut gets);
        assert!(all);
        assert_eq!(unchanged, out);
        let capture = gets[0].capture().expect("new db must be found");
        assert_eq!(capture.get("symbology"), Some("BZX"));
    }

    #[test]
    fn test_added_include_is_a_single_self_closing_line() {
        let mut actions = vec![
            Action::add(Entity::new(EntityKind::Include).with_attr("path", "overrides.locator")),
        ];
        let (out, all) = run(SAMPLE_LOCATOR, &mut actions);

        assert!(all);
        let expected = SAMPLE_LOCATOR.replace(
            "</INCLUDES>",
            "<include path=\"overrides.locator\" />\n</INCLUDES>",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_delete_database_takes_its_location_sections_too() {
        let mut actions =
            vec![Action::delete().add_where(Where::new(EntityKind::Db).with_attr("id", "S_ORDERS_FIX"))];
        let (out, all) = run(SAMPLE_LOCATOR, &mut actions);

        assert!(all);
        let expected: String = SAMPLE_LOCATOR
            .lines()
            .enumerate()
            .filter(|(i, _)| !(7..=11).contains(i))
            .map(|(_, line)| format!("{line}\n"))
            .collect();
        assert_eq!(out, expected);
        assert!(!out.contains("S_ORDERS_FIX"));
        assert!(out.contains("/om/data/common"));
    }

    #[test]
    fn test_capture_survives_a_delete_in_the_same_pass() {
        let mut actions = vec![
            Action::get().add_where(Where::new(EntityKind::ServerLocation)),
            Action::delete().add_where(
                Where::new(EntityKind::ServerLocation).with_attr("location", "tcp://prod-ts-1:50015"),
            ),
        ];
        let (out, all) = run(SAMPLE_LOCATOR, &mut actions);

        assert!(all);
        assert!(!out.contains("SERVER_LOCATION"));
        let capture = actions[0].capture().expect("get must capture");
        assert_eq!(capture.get("location"), Some("tcp://prod-ts-1:50015"));
    }

    #[test]
    fn test_streams_from_file_to_deferred_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let src = dir.path().join("prod.locator");
        let dst = dir.path().join("prod.locator.new");
        std::fs::write(&src, SAMPLE_LOCATOR).expect("seed file");

        let mut reader = FileReader::open(&src).expect("open source");
        let mut writer = FileWriter::deferred(&dst);
        let mut actions = vec![
            Action::delete()
                .add_where(Where::new(EntityKind::Include).with_attr("path", "feeds.locator")),
        ];
        let all = PatchEngine::locator()
            .apply_actions(&mut reader, &mut writer, &mut actions)
            .expect("pass must succeed");

        assert!(all);
        let expected: String = SAMPLE_LOCATOR
            .lines()
            .filter(|line| !line.contains("feeds.locator"))
            .map(|line| format!("{line}\n"))
            .collect();
        assert_eq!(std::fs::read_to_string(&dst).expect("read target"), expected);
        // The source is read-only to the pass.
        assert_eq!(std::fs::read_to_string(&src).expect("read source"), SAMPLE_LOCATOR);
    }
}
