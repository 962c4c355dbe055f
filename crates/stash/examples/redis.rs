// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Caching values in Redis.
//!
//! Expects a server at `STASH_REDIS_URL`, or `redis://127.0.0.1:6379`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stash::{Client, Configuration, Error};

#[derive(Debug, Serialize, Deserialize)]
struct Weather {
    city: String,
    celsius: f32,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut configuration = Configuration::default().with_prefix("weather");
    if let Ok(addr) = std::env::var("STASH_REDIS_URL") {
        configuration = configuration.with_addr(addr);
    }
    let client = Client::new(configuration);

    match client.get::<Weather>("oslo").await {
        Ok(weather) => println!("cached: {weather:?}"),
        Err(Error::NotFound) => {
            let weather = Weather {
                city: "Oslo".to_string(),
                celsius: -3.5,
            };
            client.set("oslo", &weather, Duration::from_secs(30)).await?;
            println!("cached for 30s under {}", client.key("oslo"));
        }
        Err(error) => return Err(error),
    }

    Ok(())
}
