//! Lists a demo catalog through the seller API.
//!
//! Signs in with `SEED_SELLER_EMAIL` / `SEED_SELLER_PASSWORD` and creates the
//! medicines below, skipping names the seller already lists.

use std::collections::HashSet;
use std::time::Duration;

use envconfig::Envconfig;
use medistore::api::ApiClient;
use medistore::config::SeedConfig;
use medistore::models::{Category, LoginRequest, MedicineInput, Role};

type Error = Box<dyn std::error::Error + Send + Sync>;

struct SeedMedicine {
    name: &'static str,
    description: &'static str,
    price: f64,
    stock: u32,
    manufacturer: &'static str,
    category: &'static str,
}

fn get_seed_data() -> Vec<SeedMedicine> {
    vec![
        SeedMedicine {
            name: "Aspirin 300mg",
            description: "Pain reliever and fever reducer.",
            price: 1.5,
            stock: 500,
            manufacturer: "Bayer",
            category: "Pain Relief",
        },
        SeedMedicine {
            name: "Amoxicillin 500mg",
            description: "Penicillin antibiotic for bacterial infections.",
            price: 12.0,
            stock: 300,
            manufacturer: "Square Pharmaceuticals",
            category: "Antibiotics",
        },
        SeedMedicine {
            name: "Lisinopril 10mg",
            description: "ACE inhibitor for high blood pressure.",
            price: 6.25,
            stock: 400,
            manufacturer: "Lupin",
            category: "Cardiovascular",
        },
        SeedMedicine {
            name: "Levothyroxine 50mcg",
            description: "Thyroid hormone replacement.",
            price: 4.0,
            stock: 250,
            manufacturer: "Merck",
            category: "Hormones",
        },
        SeedMedicine {
            name: "Metformin 500mg",
            description: "Blood sugar control for type 2 diabetes.",
            price: 3.75,
            stock: 350,
            manufacturer: "Beximco",
            category: "Diabetes",
        },
        SeedMedicine {
            name: "Amlodipine 5mg",
            description: "Calcium channel blocker for hypertension.",
            price: 5.5,
            stock: 200,
            manufacturer: "Incepta",
            category: "Cardiovascular",
        },
        SeedMedicine {
            name: "Omeprazole 20mg",
            description: "Reduces stomach acid.",
            price: 7.0,
            stock: 450,
            manufacturer: "Renata",
            category: "Gastrointestinal",
        },
        SeedMedicine {
            name: "Albuterol Inhaler",
            description: "Quick relief of asthma symptoms.",
            price: 250.0,
            stock: 150,
            manufacturer: "GSK",
            category: "Respiratory",
        },
        SeedMedicine {
            name: "Gabapentin 300mg",
            description: "Nerve pain and seizure control.",
            price: 9.0,
            stock: 300,
            manufacturer: "Pfizer",
            category: "Neurology",
        },
        SeedMedicine {
            name: "Metoprolol 50mg",
            description: "Beta blocker for heart conditions.",
            price: 4.5,
            stock: 275,
            manufacturer: "ACI",
            category: "Cardiovascular",
        },
    ]
}

/// Category named `name`, or the first one the server has.
fn pick_category<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .or_else(|| categories.first())
}

async fn seed_catalog(config: &SeedConfig) -> Result<usize, Error> {
    let api = ApiClient::new(&config.api_url, Duration::from_secs(30))?;
    let session = api
        .auth(None)
        .sign_in(&LoginRequest {
            email: config.seller_email.clone(),
            password: config.seller_password.clone(),
        })
        .await?;
    if session.user.role != Role::Seller {
        return Err(format!("{} is not a seller account", session.user.email).into());
    }

    let categories = api.medicines(Some(&session.token)).categories().await?;
    if categories.is_empty() {
        return Err("No categories exist yet; ask an admin to create some first".into());
    }

    let seller = api.seller(&session.token);
    let listed: HashSet<String> = seller
        .medicines()
        .await?
        .into_iter()
        .map(|m| m.name.to_lowercase())
        .collect();

    let mut created = 0;
    for medicine in get_seed_data() {
        if listed.contains(&medicine.name.to_lowercase()) {
            log::info!("Skipping {}, already listed", medicine.name);
            continue;
        }
        let Some(category) = pick_category(&categories, medicine.category) else {
            continue;
        };
        let input = MedicineInput {
            name: medicine.name.to_string(),
            description: medicine.description.to_string(),
            price: medicine.price,
            stock: medicine.stock,
            manufacturer: medicine.manufacturer.to_string(),
            category_id: category.id.clone(),
            image: None,
        };
        match seller.create_medicine(&input).await {
            Ok(m) => {
                log::info!("Listed {} under {}", m.name, category.name);
                created += 1;
            }
            Err(e) => log::error!("Failed to list {}: {}", medicine.name, e),
        }
    }
    Ok(created)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenvy::dotenv().ok();

    let config = SeedConfig::init_from_env()?;
    let created = seed_catalog(&config).await?;
    log::info!("Seeding finished, {} medicines created", created);
    Ok(())
}
