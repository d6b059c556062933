use rusqlite::Connection;

use bibleref::persist::Persistor;
use bibleref::{BiblerefError, BibleVersion};

fn version(command: &str, name: &str, abbr: &str, books: u64) -> BibleVersion {
    BibleVersion {
        command: command.to_string(),
        name: name.to_string(),
        abbr: abbr.to_string(),
        service: "BibleGateway".to_string(),
        service_version: abbr.to_string(),
        rtl: false,
        books,
    }
}

fn catalog(persistor: &mut Persistor) {
    for v in [
        version("esv", "English Standard Version", "ESV", 3),
        version("kjv", "King James Version", "KJV", 3),
        version("nrsv", "New Revised Standard Version", "NRSV", u64::MAX),
        version("sblgnt", "SBL Greek New Testament", "SBLGNT", 2),
    ] {
        assert!(!persistor.persist_version(&v).expect("stored"));
    }
}

#[test]
fn versions_are_stored_once() {
    let db = Connection::open_in_memory().unwrap();
    let mut persistor = Persistor::new(&db).unwrap();
    catalog(&mut persistor);
    let again = version("esv", "Something Else", "ESV2", 1);
    assert!(persistor.persist_version(&again).unwrap());
    let esv = persistor.version_by_command("esv").unwrap();
    assert_eq!(esv.name, "English Standard Version");
    assert_eq!(esv.books, 3);
    // the whole mask survives the signed column
    assert_eq!(persistor.version_by_command("nrsv").unwrap().books, u64::MAX);
}

#[test]
fn unknown_version_is_reported() {
    let db = Connection::open_in_memory().unwrap();
    let mut persistor = Persistor::new(&db).unwrap();
    catalog(&mut persistor);
    assert!(matches!(
        persistor.version_by_command("msg"),
        Err(BiblerefError::InvalidVersion(command)) if command == "msg"
    ));
    assert_eq!(persistor.version_by_abbr("msg").unwrap(), None);
    assert_eq!(persistor.version_by_abbr("KJV").unwrap().unwrap().command, "kjv");
}

#[test]
fn listing_and_searching_versions() {
    let db = Connection::open_in_memory().unwrap();
    let mut persistor = Persistor::new(&db).unwrap();
    catalog(&mut persistor);
    let commands = |versions: Vec<BibleVersion>| -> Vec<String> {
        versions.into_iter().map(|v| v.command).collect()
    };
    assert_eq!(commands(persistor.versions(None, None).unwrap()), ["esv", "kjv", "nrsv", "sblgnt"]);
    assert_eq!(commands(persistor.versions(None, Some(2)).unwrap()), ["esv", "kjv"]);
    assert_eq!(commands(persistor.versions(Some("NR"), None).unwrap()), ["nrsv"]);
    assert_eq!(
        commands(persistor.versions(Some("version"), None).unwrap()),
        ["esv", "kjv", "nrsv"]
    );
    assert_eq!(commands(persistor.versions(Some("greek"), None).unwrap()), ["sblgnt"]);
    assert!(persistor.versions(Some("vulgate"), None).unwrap().is_empty());
}

#[test]
fn user_preference_wins_over_guild() {
    let db = Connection::open_in_memory().unwrap();
    let mut persistor = Persistor::new(&db).unwrap();
    catalog(&mut persistor);
    let user = 112_233_445_566_778_899;
    let guild = u64::MAX - 7;

    assert_eq!(persistor.preferred_command(user, Some(guild), "esv").unwrap(), "esv");
    persistor.set_for_guild(guild, "nrsv").unwrap();
    assert_eq!(persistor.preferred_command(user, Some(guild), "esv").unwrap(), "nrsv");
    assert_eq!(persistor.preferred_command(user, None, "esv").unwrap(), "esv");
    persistor.set_for_user(user, "kjv").unwrap();
    assert_eq!(persistor.preferred_command(user, Some(guild), "esv").unwrap(), "kjv");
    persistor.set_for_user(user, "sblgnt").unwrap();
    let preferred = persistor.preferred_version(user, Some(guild), "esv").unwrap();
    assert_eq!(preferred.abbr, "SBLGNT");
}

#[test]
fn preference_for_unknown_version_is_refused() {
    let db = Connection::open_in_memory().unwrap();
    let mut persistor = Persistor::new(&db).unwrap();
    catalog(&mut persistor);
    assert!(matches!(
        persistor.set_for_user(1, "msg"),
        Err(BiblerefError::InvalidVersion(_))
    ));
    assert!(matches!(
        persistor.set_for_guild(2, "msg"),
        Err(BiblerefError::InvalidVersion(_))
    ));
    assert_eq!(persistor.preferred_command(1, Some(2), "esv").unwrap(), "esv");
}

#[test]
fn preferences_survive_a_new_persistor() {
    let db = Connection::open_in_memory().unwrap();
    {
        let mut persistor = Persistor::new(&db).unwrap();
        catalog(&mut persistor);
        persistor.set_for_user(7, "kjv").unwrap();
    }
    let mut persistor = Persistor::new(&db).unwrap();
    assert_eq!(persistor.preferred_command(7, None, "esv").unwrap(), "kjv");
    assert_eq!(persistor.versions(None, None).unwrap().len(), 4);
}
