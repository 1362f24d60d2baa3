//! Walks a sample reception through the seating engine.
//!
//! Configuration is read from `SEATING_*` environment variables (a `.env`
//! file is honored). Set `RUST_LOG` to override the log filter.

use seating::{
    CANVAS, SeatingAction, SeatingConfig, SeatingEnvironment, SeatingReducer, SeatingState,
    SeatingStore, TableDraft, TableShape, sample,
};
use seating_core::environment::UuidGenerator;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_tables(state: &SeatingState) {
    for view in state.table_views() {
        let names: Vec<&str> = view.guests.iter().map(|g| g.full_name.as_str()).collect();
        let warning = if view.has_conflict() { "  ⚠ conflict" } else { "" };
        println!(
            "  {:<12} {:<11} {:>5}  {}{}",
            view.table.name,
            view.table.shape.as_str(),
            view.occupancy_label(),
            names.join(", "),
            warning
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = SeatingConfig::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("warn,seating={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Seating Demo ===\n");

    let env = SeatingEnvironment::from_config(Arc::new(UuidGenerator), &config);
    let mut store = SeatingStore::new(sample::reception(), SeatingReducer::new(), env);

    store.subscribe(|event| {
        if event.changes_seats() {
            tracing::info!(?event, "Seats changed");
        }
    });

    println!("Auto-assigning attending guests...");
    store.send(SeatingAction::AutoAssign);
    print_tables(store.current());

    println!("\nAdding a two-seat sweetheart table...");
    let published = store.send(SeatingAction::AddTable {
        draft: TableDraft::default()
            .named("Sweetheart")
            .shape(TableShape::Round)
            .capacity(2)
            .at(950.0, 50.0),
    });
    let sweetheart = published
        .iter()
        .find_map(|event| match event {
            SeatingAction::TableAdded { table } => Some(table.id.clone()),
            _ => None,
        })
        .ok_or("table was not added")?;

    for guest in ["1", "4", "5"] {
        store.send(SeatingAction::AssignGuest {
            guest_id: guest.into(),
            table_id: sweetheart.clone(),
            allow_over_capacity: false,
        });
        if let Some(rejection) = store.state(|s| s.last_rejection.clone()) {
            println!("  {rejection}; confirming anyway");
            store.send(SeatingAction::AssignGuest {
                guest_id: guest.into(),
                table_id: sweetheart.clone(),
                allow_over_capacity: true,
            });
        }
    }
    print_tables(store.current());

    println!("\nDragging the sweetheart table off the right edge...");
    store.send_all([
        SeatingAction::BeginDrag {
            table_id: sweetheart.clone(),
            grab_offset: None,
        },
        SeatingAction::DragTo {
            pointer: seating::Position::new(1400.0, 90.0),
        },
        SeatingAction::EndDrag,
    ]);
    if let Some(table) = store.current().table(&sweetheart) {
        println!(
            "  stored at ({}, {}), drawn at {:?}",
            table.position.x,
            table.position.y,
            CANVAS.clip(table.position, table.shape)
        );
    }

    println!("\nDeleting the sweetheart table...");
    store.send(SeatingAction::DeleteTable {
        table_id: sweetheart,
    });
    print_tables(store.current());

    let summary = store.state(SeatingState::summary);
    println!("\nSummary: {}", serde_json::to_string_pretty(&summary)?);
    println!(
        "\nSnapshot: {}",
        serde_json::to_string(&store.state(SeatingState::snapshot))?
    );

    println!("\n=== Demo Complete ({} actions) ===", store.processed());
    Ok(())
}
