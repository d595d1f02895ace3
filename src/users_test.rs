use std::collections::BTreeMap;

use crate::config::Config;
use crate::users::{Landing, Login, User, UserDirectory};

#[test]
fn test_seeded_admin() {
    let directory = UserDirectory::new(&Config::default());
    assert_eq!(directory.len(), 1);
    let admin = directory.find_user("admin").unwrap();
    assert_eq!(admin, &User::new("admin", "admin123", true));
    assert!(directory.find_user("Admin").is_none());
}

#[test]
fn test_authenticate() {
    let mut directory = UserDirectory::new(&Config::default());

    let login = directory.authenticate("admin", "admin123");
    assert_eq!(login, Login::Matched(User::new("admin", "admin123", true)));
    assert_eq!(login.landing(), Some(Landing::Admin));

    let login = directory.authenticate("admin", "wrong");
    assert_eq!(login, Login::WrongPassword);
    assert_eq!(login.landing(), None);
    assert!(login.user().is_none());

    let login = directory.authenticate("newperson", "x");
    assert_eq!(login, Login::Created(User::new("newperson", "x", false)));
    assert_eq!(login.landing(), Some(Landing::Customer));
    assert_eq!(directory.len(), 2);

    let login = directory.authenticate("newperson", "x");
    assert_eq!(login, Login::Matched(User::new("newperson", "x", false)));
    assert_eq!(login.landing(), Some(Landing::Customer));
    assert_eq!(directory.authenticate("newperson", "y"), Login::WrongPassword);
    assert_eq!(directory.len(), 2);
}

#[test]
fn test_add_user_first_wins() {
    let mut directory = UserDirectory::empty();
    assert!(directory.is_empty());
    assert!(directory.add_user(User::new("carol", "one", false)));
    assert!(!directory.add_user(User::new("carol", "two", true)));
    let carol = directory.find_user("carol").unwrap();
    assert_eq!(carol.password, "one");
    assert!(!carol.is_admin);
}

#[test]
fn test_users_sorted() {
    let mut directory = UserDirectory::empty();
    for name in ["mallory", "bob", "alice", "trent"].iter() {
        directory.add_user(User::new(*name, "pw", false));
    }
    let names: Vec<&str> = directory.users().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob", "mallory", "trent"]);
}

#[test]
fn test_configured_admin() {
    let config = Config::from_json(r#"{"admin_username": "root", "admin_password": "toor"}"#);
    let mut directory = UserDirectory::new(&config.unwrap());
    assert!(directory.find_user("admin").is_none());
    match directory.authenticate("root", "toor") {
        Login::Matched(user) => assert!(user.is_admin),
        login => panic!("unexpected {:?}", login),
    }
}

#[test]
fn test_btree_backed_directory() {
    let mut directory: UserDirectory<BTreeMap<String, User>> =
        UserDirectory::with_index(BTreeMap::new());
    assert!(directory.add_user(User::new("zed", "pw", false)));
    assert_eq!(directory.authenticate("zed", "pw").landing(), Some(Landing::Customer));
    match directory.authenticate("amy", "pw") {
        Login::Created(user) => assert_eq!(user.username, "amy"),
        login => panic!("unexpected {:?}", login),
    }
    let names: Vec<&str> = directory.users().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["amy", "zed"]);
}
