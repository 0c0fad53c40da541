use chrono::Utc;
use nhealth_api::{AccessCredentials, Client, ConsumerCredentials, MeasureQuery, MeasureType};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let consumer = ConsumerCredentials::new(
        std::env::var("NOKIA_API_KEY")?,
        std::env::var("NOKIA_API_SECRET")?,
    );
    let access = AccessCredentials::new(
        std::env::var("NOKIA_USER_ID")?.parse()?,
        std::env::var("NOKIA_ACCESS_TOKEN")?,
        std::env::var("NOKIA_ACCESS_SECRET")?,
    );

    let client = Client::new(consumer)?;
    let query = MeasureQuery::last_days(access.user_id(), MeasureType::Weight, 30, Utc::now());
    let response = client.get_measurements(&access, query).await?;

    for (group, measure) in response.measures() {
        println!("{} {}: {:.2}", group.date, measure.measure_type, measure.scaled_value());
    }
    Ok(())
}
