// DeCert CLI - operator client for the DeCert certificate API

mod client;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use colored::{ColoredString, Colorize};
use uuid::Uuid;

use client::{ApiClient, CertificateRecord};
use decert_core::{CertificateDraft, MintStatus};

/// DeCert - certificate issuance & verification tool
#[derive(Parser)]
#[command(name = "decert")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the DeCert server
    #[arg(long, global = true, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a new certificate
    Issue(IssueArgs),
    /// Drive the mint flow for an issued certificate
    Mint {
        #[command(subcommand)]
        action: MintAction,
    },
    /// Verify a certificate by id, or list a recipient's certificates
    Verify {
        /// Certificate id
        id: Option<Uuid>,

        /// Recipient chain address
        #[arg(long, conflicts_with = "id")]
        recipient: Option<String>,
    },
    /// List all certificates
    List,
}

#[derive(Args)]
struct IssueArgs {
    /// Holder's full name
    #[arg(long)]
    name: String,

    /// Holder's email address
    #[arg(long)]
    email: String,

    /// Certificate title
    #[arg(long)]
    title: String,

    /// Optional free-form description
    #[arg(long)]
    description: Option<String>,

    /// Issue date (YYYY-MM-DD)
    #[arg(long = "date")]
    issue_date: NaiveDate,

    /// Recipient chain address (required before minting)
    #[arg(long)]
    recipient: Option<String>,

    /// Issuer chain address (defaults to the server's identity)
    #[arg(long)]
    issuer: Option<String>,
}

#[derive(Subcommand)]
enum MintAction {
    /// Prepare a mint: prints the payload the recipient must countersign
    Prepare {
        /// Certificate id
        id: Uuid,
    },
    /// Complete a prepared mint with the countersigned payload
    Complete {
        /// Certificate id
        id: Uuid,

        /// Base64 countersigned payload
        #[arg(long)]
        payload: String,
    },
    /// Single-phase mint (no countersignature round trip)
    Direct {
        /// Certificate id
        id: Uuid,
    },
}

fn main() {
    let cli = Cli::parse();
    let client = ApiClient::new(cli.server);

    let result = match cli.command {
        Commands::Issue(args) => handle_issue(&client, args),
        Commands::Mint { action } => handle_mint(&client, action),
        Commands::Verify { id, recipient } => handle_verify(&client, id, recipient),
        Commands::List => handle_list(&client),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn handle_issue(client: &ApiClient, args: IssueArgs) -> anyhow::Result<()> {
    let draft = CertificateDraft {
        holder_name: Some(args.name),
        holder_email: Some(args.email),
        title: Some(args.title),
        description: args.description,
        issue_date: Some(args.issue_date),
        recipient_address: args.recipient,
        issuer_address: args.issuer,
    };

    let record = client.issue(&draft)?;
    println!("{}", "Certificate issued.".green());
    println!();
    print_certificate(&record);
    Ok(())
}

fn handle_mint(client: &ApiClient, action: MintAction) -> anyhow::Result<()> {
    match action {
        MintAction::Prepare { id } => {
            let prepared = client.prepare_mint(id)?;
            println!("{}", "Mint prepared.".green());
            println!();
            print_certificate(&prepared.certificate);
            println!();
            println!("Payload to countersign:");
            println!("{}", prepared.payload);
            println!();
            println!(
                "Sign the payload with the recipient's wallet, then run:\n  decert mint complete {} --payload <signed>",
                id
            );
            Ok(())
        }
        MintAction::Complete { id, payload } => {
            let record = client.complete_mint(id, &payload)?;
            println!("{}", "Mint completed.".green());
            println!();
            print_certificate(&record);
            Ok(())
        }
        MintAction::Direct { id } => {
            let record = client.mint_direct(id)?;
            println!("{}", "Certificate minted.".green());
            println!();
            print_certificate(&record);
            Ok(())
        }
    }
}

fn handle_verify(
    client: &ApiClient,
    id: Option<Uuid>,
    recipient: Option<String>,
) -> anyhow::Result<()> {
    match (id, recipient) {
        (Some(id), _) => {
            let record = client.verify_by_id(id)?;
            print_certificate(&record);
            Ok(())
        }
        (None, Some(recipient)) => {
            let records = client.verify_by_recipient(&recipient)?;
            println!(
                "Found {} certificate(s) for {}",
                records.len(),
                recipient.bold()
            );
            for record in &records {
                println!();
                print_certificate(record);
            }
            Ok(())
        }
        (None, None) => Err(anyhow::anyhow!(
            "provide a certificate id or --recipient <address>"
        )),
    }
}

fn handle_list(client: &ApiClient) -> anyhow::Result<()> {
    let records = client.list()?;
    println!("{} certificate(s)", records.len());
    for record in &records {
        println!();
        print_certificate(record);
    }
    Ok(())
}

fn print_certificate(record: &CertificateRecord) {
    let c = &record.certificate;
    println!("{} {}", "Certificate".bold(), c.id);
    println!("  Status:     {}", status_label(record.status));
    println!("  Holder:     {} <{}>", c.holder_name, c.holder_email);
    println!("  Title:      {}", c.title);
    if let Some(description) = &c.description {
        println!("  About:      {}", description);
    }
    println!("  Issued:     {}", c.issue_date);
    if let Some(recipient) = &c.recipient_address {
        println!("  Recipient:  {}", recipient);
    }
    if let Some(reference) = &c.mint_reference {
        println!("  Mint ref:   {}", reference);
    }
    if let Some(signature) = &c.proof_signature {
        println!("  Proof sig:  {}", signature);
    }
}

fn status_label(status: MintStatus) -> ColoredString {
    match status {
        MintStatus::Unminted => "unminted".yellow(),
        MintStatus::PartiallyMinted => "partially minted".cyan(),
        MintStatus::Minted => "minted".green(),
    }
}
