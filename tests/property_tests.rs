/// Property-based tests using proptest
/// Tests invariants of identifier quoting and configuration parsing
use pms_db_tools::config::Config;
use pms_db_tools::inspect::{qualified_name, quote_ident};
use proptest::prelude::*;

proptest! {
    #[test]
    fn quote_ident_never_panics(ident in "\\PC*") {
        let _ = quote_ident(&ident);
    }

    #[test]
    fn quoted_ident_is_a_single_token(ident in "[^\\x00]{1,40}") {
        let quoted = quote_ident(&ident).unwrap();
        prop_assert!(quoted.starts_with('"') && quoted.ends_with('"'));

        // Inside the outer quotes every quote character comes in a pair,
        // so the identifier can never close the quoting early.
        let inner = &quoted[1..quoted.len() - 1];
        prop_assert_eq!(inner.replace("\"\"", ""), ident.replace('"', ""));
    }

    #[test]
    fn quote_ident_round_trips(ident in "[^\\x00]{1,40}") {
        let quoted = quote_ident(&ident).unwrap();
        let unquoted = quoted[1..quoted.len() - 1].replace("\"\"", "\"");
        prop_assert_eq!(unquoted, ident);
    }

    #[test]
    fn qualified_name_has_schema_prefix(schema in "[a-z_]{1,12}", table in "[a-z_]{1,12}") {
        let name = qualified_name(&schema, &table).unwrap();
        prop_assert_eq!(name, format!("\"{}\".\"{}\"", schema, table));
    }
}

proptest! {
    #[test]
    fn config_parsing_never_panics(url in "\\PC*") {
        let _ = Config::from_lookup(|key| (key == "DATABASE_URL").then(|| url.clone()));
    }

    #[test]
    fn postgres_urls_are_accepted(
        user in "[a-z]{1,8}",
        host in "[a-z]{1,12}",
        db in "[a-z]{1,8}",
        long_scheme in proptest::bool::ANY
    ) {
        let scheme = if long_scheme { "postgresql" } else { "postgres" };
        let url = format!("{}://{}@{}/{}", scheme, user, host, db);
        let config = Config::from_lookup(|key| (key == "DATABASE_URL").then(|| url.clone()));
        prop_assert!(config.is_ok());
        prop_assert_eq!(config.unwrap().database_url, url);
    }

    #[test]
    fn redacted_url_never_leaks_password(password in "[A-Z0-9]{8,16}") {
        let url = format!("postgres://admin:{}@localhost/pms", password);
        let config = Config::from_lookup(|key| (key == "DATABASE_URL").then(|| url.clone())).unwrap();
        prop_assert!(!config.redacted_url().contains(&password));
    }
}
