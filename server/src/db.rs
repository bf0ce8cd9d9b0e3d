// server/src/db.rs

//! Pool construction, schema bootstrap and the sample catalog seed.

use crate::errors::Result;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{info, instrument};

pub async fn connect(database_url: &str) -> Result<SqlitePool> {
  let pool = SqlitePoolOptions::new().connect(database_url).await?;
  Ok(pool)
}

/// Creates the three tables if absent. The UNIQUE(user_id, product_id)
/// constraint backs merge-on-add: the cart add path upserts against it
/// instead of reading then writing.
#[instrument(name = "db::init_schema", skip(pool))]
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
  sqlx::query(
    r#"
    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      username TEXT UNIQUE NOT NULL,
      email TEXT UNIQUE NOT NULL,
      password TEXT NOT NULL,
      created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
  )
  .execute(pool)
  .await?;

  sqlx::query(
    r#"
    CREATE TABLE IF NOT EXISTS products (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      description TEXT,
      price REAL NOT NULL,
      category TEXT NOT NULL,
      stock INTEGER NOT NULL DEFAULT 0,
      image_url TEXT,
      created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
  )
  .execute(pool)
  .await?;

  sqlx::query(
    r#"
    CREATE TABLE IF NOT EXISTS cart_items (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER NOT NULL,
      product_id INTEGER NOT NULL,
      quantity INTEGER NOT NULL DEFAULT 1,
      created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
      UNIQUE (user_id, product_id),
      FOREIGN KEY (user_id) REFERENCES users (id),
      FOREIGN KEY (product_id) REFERENCES products (id)
    )
    "#,
  )
  .execute(pool)
  .await?;

  info!("Database schema initialized.");
  Ok(())
}

/// Inserts the sample catalog once, when the products table is empty.
#[instrument(name = "db::seed_products", skip(pool))]
pub async fn seed_products(pool: &SqlitePool) -> Result<u64> {
  let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(pool).await?;
  if existing > 0 {
    info!("Products table already populated ({} rows), skipping seed.", existing);
    return Ok(0);
  }

  let mut inserted = 0u64;
  for (name, description, price, category, stock, image_url) in SAMPLE_PRODUCTS {
    sqlx::query("INSERT INTO products (name, description, price, category, stock, image_url) VALUES (?, ?, ?, ?, ?, ?)")
      .bind(name)
      .bind(description)
      .bind(price)
      .bind(category)
      .bind(stock)
      .bind(image_url)
      .execute(pool)
      .await?;
    inserted += 1;
  }

  info!("Seeded {} sample products.", inserted);
  Ok(inserted)
}

type SeedProduct = (&'static str, &'static str, f64, &'static str, i64, &'static str);

const SAMPLE_PRODUCTS: [SeedProduct; 25] = [
  // Pinturas
  (
    "Pintura Acrílica Blanca",
    "Pintura acrílica de alta calidad color blanco mate",
    15.99,
    "Pinturas",
    50,
    "https://via.placeholder.com/300x300/FFFFFF/000000?text=Pintura+Blanca",
  ),
  (
    "Pintura Acrílica Roja",
    "Pintura acrílica brillante color rojo intenso",
    18.50,
    "Pinturas",
    35,
    "https://via.placeholder.com/300x300/FF0000/FFFFFF?text=Pintura+Roja",
  ),
  (
    "Pintura Acrílica Azul",
    "Pintura acrílica color azul cielo, perfecta para interiores",
    17.25,
    "Pinturas",
    42,
    "https://via.placeholder.com/300x300/0000FF/FFFFFF?text=Pintura+Azul",
  ),
  (
    "Pintura Acrílica Verde",
    "Pintura acrílica color verde bosque, ideal para exteriores",
    19.75,
    "Pinturas",
    28,
    "https://via.placeholder.com/300x300/008000/FFFFFF?text=Pintura+Verde",
  ),
  (
    "Pintura Acrílica Amarilla",
    "Pintura acrílica color amarillo sol, alta cobertura",
    16.80,
    "Pinturas",
    33,
    "https://via.placeholder.com/300x300/FFFF00/000000?text=Pintura+Amarilla",
  ),
  // Pinceles
  (
    "Pincel Plano N°2",
    "Pincel de cerdas naturales, ideal para detalles finos",
    5.50,
    "Pinceles",
    75,
    "https://via.placeholder.com/300x300/8B4513/FFFFFF?text=Pincel+Plano",
  ),
  (
    "Pincel Redondo N°6",
    "Pincel redondo de pelo sintético, multiuso",
    7.25,
    "Pinceles",
    60,
    "https://via.placeholder.com/300x300/654321/FFFFFF?text=Pincel+Redondo",
  ),
  (
    "Pincel Brocha 3\"",
    "Brocha ancha para pintar superficies grandes",
    12.00,
    "Pinceles",
    25,
    "https://via.placeholder.com/300x300/A0522D/FFFFFF?text=Brocha+3",
  ),
  (
    "Set de Pinceles",
    "Set de 5 pinceles de diferentes tamaños",
    25.99,
    "Pinceles",
    20,
    "https://via.placeholder.com/300x300/D2691E/FFFFFF?text=Set+Pinceles",
  ),
  // Rodillos
  (
    "Rodillo Antigoteo",
    "Rodillo con sistema antigoteo para paredes",
    8.75,
    "Rodillos",
    40,
    "https://via.placeholder.com/300x300/FF6347/FFFFFF?text=Rodillo+Antigoteo",
  ),
  (
    "Rodillo Texturizado",
    "Rodillo para crear texturas en paredes",
    11.50,
    "Rodillos",
    22,
    "https://via.placeholder.com/300x300/CD5C5C/FFFFFF?text=Rodillo+Textura",
  ),
  (
    "Rodillo Mini",
    "Rodillo pequeño para rincones y espacios reducidos",
    4.25,
    "Rodillos",
    55,
    "https://via.placeholder.com/300x300/DC143C/FFFFFF?text=Rodillo+Mini",
  ),
  // Herramientas
  (
    "Bandeja para Pintura",
    "Bandeja plástica con rejilla para rodillo",
    6.99,
    "Herramientas",
    45,
    "https://via.placeholder.com/300x300/2F4F4F/FFFFFF?text=Bandeja",
  ),
  (
    "Espátula Metálica",
    "Espátula de acero inoxidable para raspar",
    9.25,
    "Herramientas",
    38,
    "https://via.placeholder.com/300x300/708090/FFFFFF?text=Espatula",
  ),
  (
    "Cinta de Pintor",
    "Cinta adhesiva especial para delimitar áreas",
    3.50,
    "Herramientas",
    80,
    "https://via.placeholder.com/300x300/F0E68C/000000?text=Cinta+Pintor",
  ),
  (
    "Lija Grano 120",
    "Papel de lija grano 120 para preparar superficies",
    2.75,
    "Herramientas",
    100,
    "https://via.placeholder.com/300x300/DEB887/000000?text=Lija+120",
  ),
  // Sprays
  (
    "Spray Negro Mate",
    "Pintura en spray color negro mate",
    8.99,
    "Sprays",
    30,
    "https://via.placeholder.com/300x300/000000/FFFFFF?text=Spray+Negro",
  ),
  (
    "Spray Plateado",
    "Pintura en spray color plateado metalizado",
    10.50,
    "Sprays",
    25,
    "https://via.placeholder.com/300x300/C0C0C0/000000?text=Spray+Plateado",
  ),
  (
    "Spray Transparente",
    "Barniz en spray transparente brillante",
    12.25,
    "Sprays",
    18,
    "https://via.placeholder.com/300x300/F8F8FF/000000?text=Spray+Transparente",
  ),
  // Imprimantes
  (
    "Imprimante Universal",
    "Imprimante base agua para todo tipo de superficies",
    22.50,
    "Imprimantes",
    15,
    "https://via.placeholder.com/300x300/DCDCDC/000000?text=Imprimante+Universal",
  ),
  (
    "Imprimante Anticorrosivo",
    "Imprimante especial para metal, previene óxido",
    28.75,
    "Imprimantes",
    12,
    "https://via.placeholder.com/300x300/B22222/FFFFFF?text=Imprimante+Anticorrosivo",
  ),
  // Barnices
  (
    "Barniz Mate",
    "Barniz transparente acabado mate",
    24.99,
    "Barnices",
    20,
    "https://via.placeholder.com/300x300/F5F5DC/000000?text=Barniz+Mate",
  ),
  (
    "Barniz Brillante",
    "Barniz transparente acabado brillante",
    26.50,
    "Barnices",
    18,
    "https://via.placeholder.com/300x300/FFD700/000000?text=Barniz+Brillante",
  ),
  // Accesorios
  (
    "Overol de Pintor",
    "Overol desechable para proteger la ropa",
    4.99,
    "Accesorios",
    65,
    "https://via.placeholder.com/300x300/FFFFFF/000000?text=Overol+Pintor",
  ),
  (
    "Guantes de Nitrilo",
    "Guantes desechables resistentes a químicos",
    8.25,
    "Accesorios",
    90,
    "https://via.placeholder.com/300x300/4169E1/FFFFFF?text=Guantes+Nitrilo",
  ),
];
