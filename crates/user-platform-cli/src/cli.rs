use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Register,
    SignIn,
    List,
    InitSchema,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Register(RegisterArgs),
    SignIn(SignInArgs),
    List(ListArgs),
    InitSchema(GlobalArgs),
}

impl Command {
    /// Options shared by every command that talks to the database.
    pub fn global(&self) -> &GlobalArgs {
        static NONE: GlobalArgs = GlobalArgs {
            config: None,
            database: None,
        };
        match self {
            Command::Help(_) => &NONE,
            Command::Register(args) => &args.global,
            Command::SignIn(args) => &args.global,
            Command::List(args) => &args.global,
            Command::InitSchema(global) => global,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Explicit config file; when unset, `user-platform.toml` is used if present.
    pub config: Option<PathBuf>,
    pub database: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterArgs {
    pub global: GlobalArgs,
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SignInArgs {
    pub global: GlobalArgs,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub global: GlobalArgs,
    pub json: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "register" => parse_register(it.map(|s| s.as_str())),
        "sign-in" => parse_sign_in(it.map(|s| s.as_str())),
        "list" => parse_list(it.map(|s| s.as_str())),
        "init-schema" => parse_init_schema(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Read the value of `--flag <v>` or `--flag=<v>`.
///
/// Returns `Ok(None)` when `token` is not `flag`.
fn flag_value<'a>(
    flag: &str,
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<String>> {
    if token == flag {
        let Some(v) = it.next() else {
            anyhow::bail!("{flag} requires a value");
        };
        return Ok(Some(v.to_string()));
    }
    match token.strip_prefix(flag).and_then(|rest| rest.strip_prefix('=')) {
        Some(v) => Ok(Some(v.to_string())),
        None => Ok(None),
    }
}

/// Consume `--config` / `--database`. Returns `true` if `token` was one of them.
fn parse_global<'a>(
    global: &mut GlobalArgs,
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<bool> {
    if let Some(v) = flag_value("--config", token, it)? {
        global.config = Some(PathBuf::from(v));
        return Ok(true);
    }
    if let Some(v) = flag_value("--database", token, it)? {
        global.database = Some(v);
        return Ok(true);
    }
    Ok(false)
}

fn parse_register<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut args = RegisterArgs::default();

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::Register));
        }
        if parse_global(&mut args.global, token, &mut it)? {
            continue;
        }
        if let Some(v) = flag_value("--name", token, &mut it)? {
            args.name = Some(v);
        } else if let Some(v) = flag_value("--password", token, &mut it)? {
            args.password = Some(v);
        } else if let Some(v) = flag_value("--email", token, &mut it)? {
            args.email = Some(v);
        } else if let Some(v) = flag_value("--phone-number", token, &mut it)? {
            args.phone_number = Some(v);
        } else {
            anyhow::bail!("unknown argument for register: {token}");
        }
    }

    Ok(Command::Register(args))
}

fn parse_sign_in<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut args = SignInArgs::default();

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::SignIn));
        }
        if parse_global(&mut args.global, token, &mut it)? {
            continue;
        }
        if let Some(v) = flag_value("--name", token, &mut it)? {
            args.name = Some(v);
        } else if let Some(v) = flag_value("--password", token, &mut it)? {
            args.password = Some(v);
        } else {
            anyhow::bail!("unknown argument for sign-in: {token}");
        }
    }

    Ok(Command::SignIn(args))
}

fn parse_list<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut args = ListArgs::default();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::List)),
            "--json" => args.json = true,
            _ if parse_global(&mut args.global, token, &mut it)? => {}
            _ => anyhow::bail!("unknown argument for list: {token}"),
        }
    }

    Ok(Command::List(args))
}

fn parse_init_schema<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut global = GlobalArgs::default();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::InitSchema)),
            _ if parse_global(&mut global, token, &mut it)? => {}
            _ => anyhow::bail!("unknown argument for init-schema: {token}"),
        }
    }

    Ok(Command::InitSchema(global))
}

const GLOBAL_OPTIONS: &str = "\
GLOBAL OPTIONS:
  --config <FILE>       Config file path (default: user-platform.toml, if present)
  --database <URL>      Override database.url from config (or DATABASE_URL)
  -h, --help            Print help";

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
user-platform - user registration and sign-in over PostgreSQL

USAGE:
  user-platform <COMMAND> [OPTIONS]

COMMANDS:
  register      Register a new user and print the next view
  sign-in       Check credentials and print the next view
  list          Print every stored user
  init-schema   Create the users table if it does not exist

{GLOBAL_OPTIONS}

Run `user-platform <command> --help` for more."
            );
        }
        HelpTopic::Register => {
            println!(
                "\
USAGE:
  user-platform register [OPTIONS]

OPTIONS:
  --name <NAME>                 User name (at most 16 characters)
  --password <PASSWORD>         Password
  --email <EMAIL>               Email address
  --phone-number <NUMBER>       Phone number

Prints `register-success` or `fail`.

{GLOBAL_OPTIONS}"
            );
        }
        HelpTopic::SignIn => {
            println!(
                "\
USAGE:
  user-platform sign-in [OPTIONS]

OPTIONS:
  --name <NAME>                 User name
  --password <PASSWORD>         Password

Prints `login-success` or `login-fail`.

{GLOBAL_OPTIONS}"
            );
        }
        HelpTopic::List => {
            println!(
                "\
USAGE:
  user-platform list [OPTIONS]

OPTIONS:
  --json                Print users as a JSON array (passwords omitted)

{GLOBAL_OPTIONS}"
            );
        }
        HelpTopic::InitSchema => {
            println!(
                "\
USAGE:
  user-platform init-schema [OPTIONS]

Runs CREATE TABLE IF NOT EXISTS for the users table.

{GLOBAL_OPTIONS}"
            );
        }
    }
}
