use carpool_data_management::{generate_api_token, hash_password, DataManager, NewUser};
use carpool_lib::user::Gender;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// CLI for manual data operations: user registration and place management
// happen here, not over the API.
#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=trace", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    if let Err(err) = run(&args).await {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

async fn run(args: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    let data_manager = DataManager::start().await?;

    match args {
        ["add-user", username, email, password] => {
            add_user(&data_manager, username, email, password, Gender::default(), false).await?;
        }
        ["add-user", username, email, password, gender] => {
            add_user(&data_manager, username, email, password, gender.parse()?, false).await?;
        }
        ["add-superuser", username, email, password] => {
            add_user(&data_manager, username, email, password, Gender::default(), true).await?;
        }
        ["add-place", name] => {
            let place = data_manager.register_place(name).await?;
            tracing::info!("Created place {} with id {}", place.name, place.place_id);
        }
        ["list-users"] => {
            for user in data_manager.get_users().await? {
                tracing::info!(
                    "{}: {} <{}> ({})",
                    user.user_id, user.username, user.email, user.gender.as_str()
                );
            }
        }
        ["list-places"] => {
            for place in data_manager.get_places().await? {
                tracing::info!("{}: {}", place.place_id, place.name);
            }
        }
        ["list-trips"] => {
            for trip in data_manager.get_trips(&Default::default()).await? {
                tracing::info!(
                    "{}: {} -> {} on {} ({} seats, driver {})",
                    trip.trip_id, trip.origin_id, trip.destination_id,
                    trip.trip_date, trip.num_seats, trip.user_id
                );
            }
        }
        _ => {
            tracing::info!("Usage:");
            tracing::info!("  add-user <username> <email> <password> [gender]");
            tracing::info!("  add-superuser <username> <email> <password>");
            tracing::info!("  add-place <name>");
            tracing::info!("  list-users | list-places | list-trips");
        }
    }

    Ok(())
}

async fn add_user(
    data_manager: &DataManager,
    username: &str,
    email: &str,
    password: &str,
    gender: Gender,
    superuser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let new_user = NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: hash_password(password),
        gender,
        birth_date: None,
        is_staff: superuser,
        is_superuser: superuser,
        api_token: generate_api_token(),
    };
    let user = data_manager.register_user(&new_user).await?;
    tracing::info!("Created user {} with id {}", user.username, user.user_id);
    tracing::info!("API token: {}", user.api_token);
    Ok(())
}
