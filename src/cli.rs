use colored::Colorize;
use flag_loadr::{define_flags, format_flag_errors, Bind, FlagError, FlagSet};

define_flags! {
    #[derive(Debug)]
    pub struct DemoFlags {
        #[flag(names = ["-H", "--host"], env = "DEMO_HOST", doc = "Address to bind", default = "127.0.0.1")]
        pub host: String,

        #[flag(names = ["-p", "--port"], env = "DEMO_PORT", doc = "Port to listen on", default = "8080")]
        pub port: u16,

        #[flag(names = ["-s", "--server"], env = "DEMO_SERVERS", separator = ",", doc = "Upstream servers")]
        pub servers: Vec<String>,

        #[flag(names = ["-v", "--verbose"], env = "DEMO_VERBOSE", doc = "Print resolved values")]
        pub verbose: bool,
    }
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    match args.first().map(String::as_str) {
        Some("flags") => run_flag_set(&args[1..]),
        Some("bind") => run_bind(&args[1..]),
        Some("usage") => print_usage(),
        Some("docs") => generate_docs(),
        Some(other) => println!(
            "unknown command: {}. Available: flags, bind, usage, docs",
            other
        ),
        None => {
            println!("Usage: flag-loadr-demo [command] [flags...]");
            println!("Commands:");
            println!("  flags  - Resolve flags declared on a FlagSet");
            println!("  bind   - Resolve flags into a struct with define_flags!");
            println!("  usage  - Print usage text for the bound struct");
            println!("  docs   - Generate FLAGS.md documentation");
        }
    };
}

fn demo_flag_set() -> Result<FlagSet, FlagError> {
    let mut flags = FlagSet::new();
    flags.add_bool_flags(&["-b", "--boolean"], "a boolean flag")?;
    flags.add_multi_flags_with_env(
        &["-l", "--long"],
        "LONG_FLAG_ENV",
        "1,2",
        ",",
        "-l and --long set the long things",
    )?;
    flags.add_multi_flags(
        &["-w", "--without-env"],
        "value01,value02",
        ",",
        "without environment variable",
    )?;
    flags.add_mono_flag_with_env("-n", "DEMO_COUNT", "3", "a single number")?;
    Ok(flags)
}

fn run_flag_set(args: &[String]) {
    let result = demo_flag_set().and_then(|mut flags| {
        flags.parse_from(args, &flag_loadr::ProcessEnv)?;
        Ok(flags)
    });

    let flags = match result {
        Ok(flags) => flags,
        Err(e) => exit_with(&[e]),
    };

    println!("Flags resolved successfully!");
    match flags.get_bool("-b") {
        Ok(b) => println!("  -b: {}", b),
        Err(e) => exit_with(&[e]),
    }
    match flags.get_int("-l") {
        Ok(values) => println!("  -l: {:?}", values),
        Err(e) => exit_with(&[e]),
    }
    match flags.get_string("-w") {
        Ok(values) => println!("  -w: {:?}", values),
        Err(e) => exit_with(&[e]),
    }
    match flags.get_uint8("-n") {
        Ok(values) => println!("  -n: {:?}", values),
        Err(e) => exit_with(&[e]),
    }
}

fn run_bind(args: &[String]) {
    match DemoFlags::load_from(args, &flag_loadr::ProcessEnv) {
        Ok(flags) => {
            println!("Flags bound successfully!");
            println!("  host: {}", *flags.host);
            println!("  port: {}", *flags.port);
            println!("  servers: {:?}", *flags.servers);
            if *flags.verbose {
                println!("{:#?}", flags);
            }
        }
        Err(errors) => exit_with(&errors),
    }
}

fn print_usage() {
    match DemoFlags::schema().usage("flag-loadr-demo bind") {
        Ok(usage) => print!("{}", usage),
        Err(e) => exit_with(&[e]),
    }
}

fn generate_docs() {
    println!("Generating documentation for DemoFlags...");
    match DemoFlags::schema().write_docs("FLAGS.md") {
        Ok(_) => println!("{} Documentation written to FLAGS.md", "✓".green()),
        Err(e) => eprintln!("{} Failed to write documentation: {}", "✗".red(), e),
    }
}

fn exit_with(errors: &[FlagError]) -> ! {
    eprintln!("{}", format_flag_errors(errors));
    std::process::exit(1);
}
