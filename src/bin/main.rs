//! Satchel CLI - developer tools over the shared wallet logic
//!
//!   satchel keys <prefix>                 → Enabled keys and suggestions for a typed prefix
//!   satchel validate <words...>           → Recovery phrase size and checksum
//!   satchel xpub --mnemonic <words>       → Account xpub and output descriptors
//!          [--network bitcoin|testnet|signet|regtest] [--script p2pkh|p2sh-p2wpkh|p2wpkh|p2tr] [--account N]
//!   satchel fee-rate <sat/vB>             → Fee rate label
//!
//! Output format:
//!   --json     Output compact JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use satchel::config::{default_data_dir, AppConfig};
use satchel::fees::fee_rate_with_unit;
use satchel::logging::init_logging;
use satchel::mnemonic::{normalize_phrase, KEY_ROWS, MAX_SUGGESTIONS};
use satchel::session::AccountType;
use satchel::{Bip39Validator, MnemonicValidator, PhraseKeyboard, RecoveryPhraseSize, SinglesigKeys};
use serde_json::{json, Value};
use std::env;
use std::io::IsTerminal;
use tracing::debug;

fn main() {
    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    let config = AppConfig::new(default_data_dir("satchel")).with_debug(opts.debug);
    init_logging(&config);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("satchel {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("keys") => cmd_keys(&opts),
        Some("validate") => cmd_validate(&opts),
        Some("xpub") => cmd_xpub(&opts),
        Some("fee-rate") => cmd_fee_rate(&opts),
        Some(cmd) => Err(format!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = !opts.json && (opts.pretty || std::io::stdout().is_terminal());
    match result {
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            eprintln!("{}", render(&json!({"error": e}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.unwrap_or_else(|_| value.to_string())
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    positional: Vec<String>,
    mnemonic: Option<String>,
    passphrase: Option<String>,
    network: Option<String>,
    script: Option<String>,
    account: Option<String>,
    json: bool,
    pretty: bool,
    debug: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            let value = args.get(i + 1).cloned();
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--json" => opts.json = true,
                "--pretty" => opts.pretty = true,
                "--debug" => opts.debug = true,
                "--mnemonic" | "-m" => { opts.mnemonic = value; i += 1; }
                "--passphrase" => { opts.passphrase = value; i += 1; }
                "--network" | "-n" => { opts.network = value; i += 1; }
                "--script" | "-s" => { opts.script = value; i += 1; }
                "--account" | "-a" => { opts.account = value; i += 1; }
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }

        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }
        opts.positional = positional;

        // Environment variables (lower priority than CLI args)
        if opts.mnemonic.is_none() {
            opts.mnemonic = env::var("SATCHEL_MNEMONIC").ok().filter(|s| !s.is_empty());
        }
        if opts.network.is_none() {
            opts.network = env::var("SATCHEL_NETWORK").ok().filter(|s| !s.is_empty());
        }
        opts.debug |= env::var("SATCHEL_DEBUG").map(|v| v == "1").unwrap_or(false);

        opts
    }
}

fn cmd_keys(opts: &ParsedArgs) -> Result<Value, String> {
    let prefix = opts.positional.first().map(|p| p.to_lowercase()).unwrap_or_default();
    let keyboard = PhraseKeyboard::english();
    let enabled = keyboard.enabled_keys(&prefix);
    // Disabled keys shown as dots, in on-screen order
    let rows: Vec<String> = KEY_ROWS
        .iter()
        .map(|row| row.chars().map(|c| if enabled.contains(&c) { c } else { '.' }).collect())
        .collect();
    debug!(%prefix, "keys");
    Ok(json!({
        "prefix": prefix,
        "enabled_keys": enabled.iter().collect::<String>(),
        "keyboard": rows,
        "suggestions": keyboard.suggestions(&prefix, MAX_SUGGESTIONS),
        "matches": keyboard.candidates(&prefix).len(),
        "completed": keyboard.completed(&prefix),
    }))
}

fn cmd_validate(opts: &ParsedArgs) -> Result<Value, String> {
    let words = normalize_phrase(&opts.positional.join(" "));
    if words.is_empty() {
        return Err("Usage: satchel validate <words...>".into());
    }
    let keyboard = PhraseKeyboard::english();
    let unknown: Vec<&String> = words.iter().filter(|w| !keyboard.contains(w)).collect();
    let size = RecoveryPhraseSize::from_word_count(words.len());
    Ok(json!({
        "words": words.len(),
        "size": size,
        "encrypted": size.map(|s| s.is_encrypted()).unwrap_or(false),
        "unknown_words": unknown,
        "valid": Bip39Validator::default().is_valid(&words),
    }))
}

fn cmd_xpub(opts: &ParsedArgs) -> Result<Value, String> {
    let mnemonic = opts.mnemonic.as_deref().ok_or("--mnemonic is required")?;
    let network = parse_network(opts.network.as_deref().unwrap_or("bitcoin"))?;
    let script = parse_script(opts.script.as_deref().unwrap_or("p2wpkh"))?;
    let account = match opts.account.as_deref() {
        Some(n) => n.parse::<u32>().map_err(|e| format!("--account: {e}"))?,
        None => 0,
    };
    let keys = SinglesigKeys::derive(mnemonic, opts.passphrase.as_deref(), network, script, account)
        .map_err(|e| e.to_string())?;
    serde_json::to_value(keys).map_err(|e| e.to_string())
}

fn cmd_fee_rate(opts: &ParsedArgs) -> Result<Value, String> {
    let rate = opts
        .positional
        .first()
        .ok_or("Usage: satchel fee-rate <sat/vB>")?
        .parse::<u64>()
        .map_err(|e| format!("fee rate: {e}"))?;
    Ok(json!({ "sat_per_vbyte": rate, "label": fee_rate_with_unit(rate) }))
}

fn parse_network(value: &str) -> Result<bitcoin::Network, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "bitcoin" | "mainnet" => Ok(bitcoin::Network::Bitcoin),
        "testnet" => Ok(bitcoin::Network::Testnet),
        "signet" => Ok(bitcoin::Network::Signet),
        "regtest" => Ok(bitcoin::Network::Regtest),
        other => Err(format!("Unknown network: {other}")),
    }
}

fn parse_script(value: &str) -> Result<AccountType, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "p2pkh" | "legacy" => Ok(AccountType::P2pkh),
        "p2sh-p2wpkh" | "p2sh_p2wpkh" | "wrapped" => Ok(AccountType::P2shP2wpkh),
        "p2wpkh" | "segwit" => Ok(AccountType::P2wpkh),
        "p2tr" | "taproot" => Ok(AccountType::P2tr),
        other => Err(format!("Unknown script: {other}")),
    }
}

fn print_usage() {
    println!(
        r#"satchel - wallet logic developer tools

USAGE:
    satchel <command> [args] [options]

COMMANDS:
    keys <prefix>          Enabled keyboard keys and suggestions for a prefix
    validate <words...>    Check a recovery phrase (12, 24 or 27 words)
    xpub                   Derive account xpub and output descriptors
    fee-rate <sat/vB>      Format a fee rate

OPTIONS:
    -m, --mnemonic <words> Recovery phrase (or SATCHEL_MNEMONIC)
        --passphrase <p>   BIP39 passphrase
    -n, --network <net>    bitcoin | testnet | signet | regtest (or SATCHEL_NETWORK)
    -s, --script <type>    p2pkh | p2sh-p2wpkh | p2wpkh | p2tr
    -a, --account <n>      Account number (default 0)
        --json             Compact JSON output
        --pretty           Pretty JSON output
        --debug            Debug logging (or SATCHEL_DEBUG=1)
    -h, --help             Show this help
    -V, --version          Show version"#
    );
}
