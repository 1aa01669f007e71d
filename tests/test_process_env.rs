use flag_loadr::{define_flags, Bind, FlagSet, ProcessEnv};
use serial_test::serial;
use std::env;

define_flags! {
    pub struct FixtureFlags {
        #[flag(names = ["--port"], env = "TEST_FLAG_PORT", doc = "Server port", default = "8080")]
        pub port: u16,

        #[flag(names = ["--host"], env = "TEST_FLAG_HOST", doc = "Server host")]
        pub host: String,

        #[flag(names = ["--server"], env = "TEST_FLAG_SERVERS", separator = ",", doc = "Upstream servers")]
        pub servers: Vec<String>,

        #[flag(names = ["--verbose"], env = "TEST_FLAG_VERBOSE", doc = "Verbose output")]
        pub verbose: bool,

        #[flag(names = ["--ratio"], env = "TEST_FLAG_RATIO", doc = "Sampling ratio")]
        pub ratio: Option<f64>,
    }
}

fn load_fixture() {
    dotenvy::from_filename_override("./test.env").unwrap();
}

#[test]
#[serial]
fn test_load_from_env_file() {
    load_fixture();

    let flags = FixtureFlags::load_from(Vec::<String>::new(), &ProcessEnv).unwrap();

    assert_eq!(*flags.port, 9443);
    assert_eq!(*flags.host, "example.org");
    assert_eq!(*flags.servers, ["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
    // any non-empty value sets a boolean flag
    assert!(*flags.verbose);
    assert_eq!(*flags.ratio, Some(0.25));
}

#[test]
#[serial]
fn test_arguments_override_env_file() {
    load_fixture();

    let flags = FixtureFlags::load_from(["--port", "1", "--server", "local"], &ProcessEnv).unwrap();

    assert_eq!(*flags.port, 1);
    assert_eq!(*flags.servers, ["local"]);
    assert_eq!(*flags.host, "example.org");
}

#[test]
#[serial]
fn test_empty_variable_is_unset() {
    load_fixture();
    env::set_var("TEST_FLAG_PORT", "");
    env::remove_var("TEST_FLAG_RATIO");

    let flags = FixtureFlags::load_from(Vec::<String>::new(), &ProcessEnv).unwrap();

    assert_eq!(*flags.port, 8080);
    assert_eq!(*flags.ratio, None);

    env::remove_var("TEST_FLAG_PORT");
}

#[test]
#[serial]
fn test_flag_set_reads_process_env() {
    env::set_var("TEST_FLAG_LEVELS", "1;2;3");

    let mut flags = FlagSet::new();
    flags
        .add_multi_flag_with_env("--level", "TEST_FLAG_LEVELS", "", ";", "levels")
        .unwrap();
    flags.parse_from(Vec::<String>::new(), &ProcessEnv).unwrap();

    assert_eq!(flags.get_uint("--level").unwrap(), [1, 2, 3]);

    env::remove_var("TEST_FLAG_LEVELS");
}
