//! splitledger CLI
//!
//! Compute splits and settlement suggestions from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Suggest settlements for a group file
//! splitledger settle --input group.json
//!
//! # Same, as the authorization-checked member "alice", output as JSON
//! splitledger settle --input group.json --caller alice --format json
//!
//! # Split one amount without a group file
//! splitledger split --amount 90 --policy equal --users alice,bob,carol
//! splitledger split --amount 100 --policy exact --shares alice=40,bob=60
//!
//! # Generate a random group for testing
//! splitledger generate --users 8 --expenses 40
//! ```

use rust_decimal::Decimal;
use splitledger::core::expense::{Expense, ExpenseSet, SplitPolicy};
use splitledger::core::money::Money;
use splitledger::core::user::{GroupId, UserId};
use splitledger::error::EngineError;
use splitledger::settlement::suggester::{
    suggest_settlements, BalanceStatus, InMemoryGroupStore, SettlementSuggester,
    SettlementSuggestion,
};
use splitledger::simulation::generator::{generate_random_group, GroupConfig};
use splitledger::split::calculator::{Participant, SplitCalculator};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"splitledger — group expense ledger and settlement engine

USAGE:
    splitledger <COMMAND> [OPTIONS]

COMMANDS:
    settle      Suggest transfers that settle a group's balances
    split       Split one amount into per-participant shares
    generate    Generate a random group file (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>      Path to JSON group file
    --caller <USER>     Run the membership-checked query as this user
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (split):
    --amount <AMOUNT>   Expense amount, e.g. 90 or 12.34
    --policy <POLICY>   equal, exact, or percentage
    --users <LIST>      Comma-separated users (equal policy)
    --shares <LIST>     user=value pairs: amounts for exact,
                        percentages for percentage

OPTIONS (generate):
    --users <N>         Number of users (default: 8)
    --expenses <N>      Number of expenses (default: 40)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    splitledger settle --input group.json
    splitledger settle --input group.json --caller alice --format json
    splitledger split --amount 90 --policy equal --users alice,bob,carol
    splitledger split --amount 50 --policy percentage --shares alice=50,bob=30,carol=20
    splitledger generate --users 12 --expenses 80 --output group.json"#
    );
}

/// JSON schema for input group files.
#[derive(serde::Deserialize)]
struct GroupFile {
    group: String,
    expenses: Vec<ExpenseInput>,
}

#[derive(serde::Deserialize)]
struct ExpenseInput {
    payer: String,
    amount: String,
    #[serde(default = "default_category")]
    category: String,
    policy: String,
    participants: Vec<ParticipantInput>,
}

#[derive(serde::Deserialize)]
struct ParticipantInput {
    user: String,
    amount: Option<String>,
    percentage: Option<String>,
}

fn default_category() -> String {
    "general".to_string()
}

/// JSON output schema for settlement suggestions.
#[derive(serde::Serialize)]
struct SuggestionOutput {
    balances: Vec<BalanceOutput>,
    transfers: Vec<TransferOutput>,
}

#[derive(serde::Serialize)]
struct BalanceOutput {
    user: String,
    amount: String,
    status: String,
}

#[derive(serde::Serialize)]
struct TransferOutput {
    from: String,
    to: String,
    amount: String,
}

impl SuggestionOutput {
    fn from_suggestion(suggestion: &SettlementSuggestion) -> Self {
        Self {
            balances: suggestion
                .balances
                .iter()
                .map(|b| BalanceOutput {
                    user: b.user.to_string(),
                    amount: b.amount.to_string(),
                    status: match b.status {
                        BalanceStatus::Owed => "owed".to_string(),
                        BalanceStatus::Owes => "owes".to_string(),
                    },
                })
                .collect(),
            transfers: suggestion
                .transfers
                .iter()
                .map(|t| TransferOutput {
                    from: t.from.to_string(),
                    to: t.to.to_string(),
                    amount: t.amount.to_string(),
                })
                .collect(),
        }
    }
}

fn parse_money(s: &str) -> Money {
    s.parse().unwrap_or_else(|e| {
        eprintln!("Invalid amount '{}': {}", s, e);
        process::exit(1);
    })
}

fn parse_policy(s: &str) -> SplitPolicy {
    s.parse().unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    })
}

fn load_group(path: &str) -> (GroupId, ExpenseSet) {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: GroupFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "group": "ski-trip",
  "expenses": [
    {{ "payer": "alice", "amount": "90.00", "category": "dinner",
      "policy": "equal",
      "participants": [ {{ "user": "alice" }}, {{ "user": "bob" }}, {{ "user": "carol" }} ] }}
  ]
}}"#
        );
        process::exit(1);
    });

    let group = GroupId::new(&file.group);
    let mut set = ExpenseSet::new();
    for input in file.expenses {
        let amount = parse_money(&input.amount);
        let policy = parse_policy(&input.policy);
        let participants: Vec<Participant> = input
            .participants
            .iter()
            .map(|p| Participant {
                user: UserId::new(&p.user),
                amount: p.amount.as_deref().map(parse_money),
                percentage: p.percentage.as_deref().map(|pct| {
                    pct.parse::<Decimal>().unwrap_or_else(|e| {
                        eprintln!("Invalid percentage '{}': {}", pct, e);
                        process::exit(1);
                    })
                }),
            })
            .collect();

        let splits = SplitCalculator::compute(amount, policy, &participants).unwrap_or_else(|e| {
            eprintln!("Invalid expense (payer {}): {}", input.payer, e);
            process::exit(1);
        });
        let expense = Expense::new(
            group.clone(),
            UserId::new(&input.payer),
            amount,
            input.category,
            policy,
            splits,
        )
        .unwrap_or_else(|e| {
            eprintln!("Invalid expense (payer {}): {}", input.payer, e);
            process::exit(1);
        });
        set.add(expense);
    }
    (group, set)
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut caller: Option<String> = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--caller" => {
                i += 1;
                caller = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--caller requires a user id");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let (group, set) = load_group(&path);

    let suggestion = match caller {
        Some(user) => {
            let mut store = InMemoryGroupStore::new();
            for expense in set.expenses() {
                store.add_expense(expense.clone());
            }
            let suggester = SettlementSuggester::new(&store, &store);
            suggester
                .suggest_for_group(&group, &UserId::new(&user))
                .unwrap_or_else(|e| {
                    match e {
                        EngineError::Validation(v) => eprintln!("Error: {}", v),
                        EngineError::Invariant(v) => {
                            eprintln!("Internal invariant violated: {}", v)
                        }
                    }
                    process::exit(1);
                })
        }
        None => suggest_settlements(set.expenses()).unwrap_or_else(|e| {
            eprintln!("Internal invariant violated: {}", e);
            process::exit(1);
        }),
    };

    if format == "json" {
        let output = SuggestionOutput::from_suggestion(&suggestion);
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        println!("{}", suggestion);
    }
}

fn cmd_split(args: &[String]) {
    let mut amount: Option<String> = None;
    let mut policy = "equal".to_string();
    let mut users_str: Option<String> = None;
    let mut shares_str: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--amount" => {
                i += 1;
                amount = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--amount requires a value");
                    process::exit(1);
                }));
            }
            "--policy" => {
                i += 1;
                policy = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--policy requires equal, exact, or percentage");
                    process::exit(1);
                });
            }
            "--users" => {
                i += 1;
                users_str = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--users requires a comma-separated list");
                    process::exit(1);
                }));
            }
            "--shares" => {
                i += 1;
                shares_str = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--shares requires user=value pairs");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let amount = parse_money(&amount.unwrap_or_else(|| {
        eprintln!("Error: --amount <AMOUNT> is required");
        process::exit(1);
    }));
    let policy = parse_policy(&policy);

    let participants: Vec<Participant> = match policy {
        SplitPolicy::Equal => {
            let users = users_str.unwrap_or_else(|| {
                eprintln!("Error: --users <LIST> is required for equal splits");
                process::exit(1);
            });
            users
                .split(',')
                .map(|u| Participant::even(UserId::new(u.trim())))
                .collect()
        }
        SplitPolicy::Exact | SplitPolicy::Percentage => {
            let shares = shares_str.unwrap_or_else(|| {
                eprintln!("Error: --shares <LIST> is required for this policy");
                process::exit(1);
            });
            shares
                .split(',')
                .map(|pair| {
                    let (user, value) = pair.split_once('=').unwrap_or_else(|| {
                        eprintln!("Invalid share '{}': expected user=value", pair);
                        process::exit(1);
                    });
                    let user = UserId::new(user.trim());
                    match policy {
                        SplitPolicy::Exact => Participant::owing(user, parse_money(value.trim())),
                        _ => Participant::owing_percent(
                            user,
                            value.trim().parse::<Decimal>().unwrap_or_else(|e| {
                                eprintln!("Invalid percentage '{}': {}", value, e);
                                process::exit(1);
                            }),
                        ),
                    }
                })
                .collect()
        }
    };

    let splits = SplitCalculator::compute(amount, policy, &participants).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    println!("Splitting {} ({} policy):", amount, policy);
    for split in &splits {
        match split.percentage {
            Some(pct) => println!("  {}: {} ({}%)", split.user, split.amount, pct),
            None => println!("  {}: {}", split.user, split.amount),
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut users = 8usize;
    let mut expenses = 40usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--users" => {
                i += 1;
                users = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--users requires a number");
                    process::exit(1);
                });
            }
            "--expenses" => {
                i += 1;
                expenses = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--expenses requires a number");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = GroupConfig {
        user_count: users,
        expense_count: expenses,
        ..Default::default()
    };
    let set = generate_random_group(&config);

    #[derive(serde::Serialize)]
    struct OutputParticipant {
        user: String,
    }

    #[derive(serde::Serialize)]
    struct OutputExpense {
        payer: String,
        amount: String,
        category: String,
        policy: String,
        participants: Vec<OutputParticipant>,
    }

    #[derive(serde::Serialize)]
    struct OutputFile {
        group: String,
        expenses: Vec<OutputExpense>,
    }

    let output = OutputFile {
        group: "generated".to_string(),
        expenses: set
            .expenses()
            .iter()
            .map(|e| OutputExpense {
                payer: e.payer().to_string(),
                amount: e.amount().to_string(),
                category: e.category().to_string(),
                policy: e.policy().to_string(),
                participants: e
                    .splits()
                    .iter()
                    .map(|s| OutputParticipant {
                        user: s.user.to_string(),
                    })
                    .collect(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} users → {}",
            set.len(),
            users,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "split" => cmd_split(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
