//! bistro - command-line surface over the restaurant client
//!
//! Every command restores the stored session first; screen commands are
//! refused when the logged-in role may not open that screen.

use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Context;
use bistro_client::{
    BistroClient, Cart, Category, ClientConfig, ClientError, ClientResult, HttpClient, KitchenBoard,
    KitchenTab, MenuItem, Order, OrderStatus, Poller, RegisterRequest, Screen, TableContext,
    TableSelection, UserRole, guard, screens_for,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bistro", author, version, about = "Restaurant ordering client")]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "BISTRO_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the bearer token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BISTRO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BISTRO_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long, default_value = "customer")]
        role: UserRole,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List menu items
    Menu {
        #[arg(long)]
        category: Option<Category>,
    },
    /// Build a cart and submit it as an order
    Order {
        /// Scanned table code, e.g. "table=7"
        #[arg(long)]
        table_query: String,
        /// Menu item ids, optionally with a quantity: 4 or 4x2
        #[arg(required = true)]
        items: Vec<ItemArg>,
    },
    /// Show the kitchen board
    Kitchen {
        #[arg(long, default_value = "pending")]
        tab: KitchenTab,
        /// Keep polling until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Move an order to its next kitchen status
    Advance { order_id: i64, status: OrderStatus },
    /// List tables
    Tables,
    /// Open an empty order on a free table
    OpenTable { id: i64 },
    /// Deliver the current order and free the table
    CloseTable { id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ItemArg {
    menu_item_id: i64,
    quantity: i64,
}

impl FromStr for ItemArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = match s.split_once(['x', 'X']) {
            Some((id, qty)) => {
                let qty = qty
                    .parse::<i64>()
                    .map_err(|_| format!("bad quantity in '{s}'"))?;
                (id, qty)
            }
            None => (s, 1),
        };
        let menu_item_id = id
            .parse::<i64>()
            .map_err(|_| format!("bad menu item id in '{s}'"))?;
        Ok(Self {
            menu_item_id,
            quantity,
        })
    }
}

/// Add `quantity` of `item`, on top of whatever the cart already holds
fn add_to_cart(cart: &mut Cart, item: &MenuItem, quantity: i64) -> ClientResult<()> {
    if quantity < 1 {
        return Err(ClientError::InvalidQuantity(quantity));
    }
    let existing = cart.quantity_of(item.id).map(i64::from).unwrap_or(0);
    cart.add_item(item);
    cart.set_quantity(item.id, existing + quantity)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bistro_client=info,bistro=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "Command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    let client = BistroClient::connect(&config)?;
    let auth = client.auth();

    match cli.command {
        Command::Login { email, password } => {
            let user = auth.login(&email, &password).await?;
            println!("Logged in as {} ({})", user.full_name, user.role);
        }
        Command::Register {
            email,
            password,
            full_name,
            role,
        } => {
            let request = RegisterRequest {
                email,
                password,
                full_name,
                role,
            };
            let user = auth.register(&request).await?;
            println!(
                "Registered and logged in as {} ({})",
                user.full_name, user.role
            );
        }
        Command::Logout => {
            auth.logout()?;
            println!("Logged out");
        }
        Command::Whoami => match auth.restore().await {
            Some(user) => {
                let screens: Vec<&str> = screens_for(Some(&user))
                    .iter()
                    .map(|s| s.as_str())
                    .collect();
                println!(
                    "{} <{}> role={} screens={}",
                    user.full_name,
                    user.email,
                    user.role,
                    screens.join(",")
                );
            }
            None => println!("Not logged in"),
        },
        command => {
            auth.restore().await;
            run_screen(&client, &config, command).await?;
        }
    }
    Ok(())
}

async fn run_screen<H: HttpClient>(
    client: &BistroClient<H>,
    config: &ClientConfig,
    command: Command,
) -> anyhow::Result<()> {
    match command {
        Command::Menu { category } => {
            guard(client.session(), Screen::Menu)?;
            for item in client.catalog().list_items(category).await? {
                let marker = if item.is_available {
                    ""
                } else {
                    " (unavailable)"
                };
                println!(
                    "{:>4}  {:<28} {:>8.2}  {}{}",
                    item.id, item.name, item.price, item.category, marker
                );
            }
        }
        Command::Order { table_query, items } => {
            guard(client.session(), Screen::Menu)?;
            let table = TableContext::from_query(&table_query);
            let catalog = client.catalog();
            let mut cart = Cart::new();
            for arg in items {
                let item = catalog
                    .get_item(arg.menu_item_id)
                    .await
                    .with_context(|| format!("menu item {}", arg.menu_item_id))?;
                add_to_cart(&mut cart, &item, arg.quantity)?;
            }
            let order = cart.submit(&client.orders(), table).await?;
            println!(
                "Order {} placed for table {}: {:.2}",
                order.id, order.table_id, order.total_amount
            );
        }
        Command::Kitchen { tab, watch } => {
            guard(client.session(), Screen::Kitchen)?;
            let board = client.kitchen_board();
            board.select_tab(tab);
            if watch {
                let printer = board.clone();
                let _handle = Poller::spawn("kitchen-watch", config.poll_interval, move || {
                    let board = printer.clone();
                    async move {
                        if board.refresh().await.is_ok() {
                            print_kitchen(&board);
                        }
                    }
                });
                tokio::signal::ctrl_c().await?;
            } else {
                board.refresh().await?;
                print_kitchen(&board);
            }
        }
        Command::Advance { order_id, status } => {
            guard(client.session(), Screen::Kitchen)?;
            let board = client.kitchen_board();
            board.refresh().await?;
            let order = board.advance(order_id, status).await?;
            println!("Order {} is now {}", order.id, order.status);
        }
        Command::Tables => {
            guard(client.session(), Screen::Tables)?;
            let board = client.table_board();
            board.refresh().await?;
            for table in board.tables() {
                let state = match table.current_order_id {
                    Some(order_id) => format!("occupied (order {order_id})"),
                    None if table.is_occupied => "occupied".to_string(),
                    None => "free".to_string(),
                };
                println!(
                    "{:>4}  table {:<3} seats {:<2} {}",
                    table.id, table.number, table.capacity, state
                );
            }
        }
        Command::OpenTable { id } => {
            guard(client.session(), Screen::Tables)?;
            let board = client.table_board();
            board.refresh().await?;
            match board.select(id).await? {
                TableSelection::Vacant(intake) => {
                    let order = board.open_order(intake.table()).await?;
                    println!(
                        "Opened order {} on table {}",
                        order.id,
                        intake.table().number
                    );
                }
                TableSelection::Occupied { table, order } => {
                    anyhow::bail!("table {} already has order {}", table.number, order.id)
                }
            }
        }
        Command::CloseTable { id } => {
            guard(client.session(), Screen::Tables)?;
            let board = client.table_board();
            board.refresh().await?;
            match board.select(id).await? {
                TableSelection::Occupied { table, order } => {
                    let order = board.close_order(&table, &order).await?;
                    println!(
                        "Order {} delivered, table {} is free",
                        order.id, table.number
                    );
                }
                TableSelection::Vacant(intake) => {
                    anyhow::bail!("table {} has no open order", intake.table().number)
                }
            }
        }
        Command::Login { .. } | Command::Register { .. } | Command::Logout | Command::Whoami => {}
    }
    Ok(())
}

fn print_kitchen<H: HttpClient>(board: &KitchenBoard<H>) {
    let counts = board.counts();
    let tabs: Vec<String> = KitchenTab::ALL
        .iter()
        .map(|t| format!("{}={}", t, counts.get(*t)))
        .collect();
    println!("[{}] showing {}", tabs.join(" "), board.tab());
    for order in board.visible_orders() {
        print_order(&order, board.actions_for(&order).map(|a| a.label()));
    }
}

fn print_order(order: &Order, action: Option<&str>) {
    println!(
        "  #{:<5} table {:<4} {:>8.2}  {} item(s){}",
        order.id,
        order.table_id,
        order.total_amount,
        order.items.iter().map(|i| i.quantity).sum::<i32>(),
        action.map(|a| format!("  -> {a}")).unwrap_or_default()
    );
}
