use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use jobhub_backend::config::{Config, CONFIG};
use jobhub_backend::error::Error;
use jobhub_backend::models::user::User;
use jobhub_backend::services::application_service::ApplicationService;
use jobhub_backend::services::job_service::JobService;
use jobhub_backend::services::like_service::LikeService;

// Runs only against a real database; the unique-index backstops and the
// cached counters cannot be observed any other way.
async fn test_pool() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping database-backed test");
            return None;
        }
    };
    CONFIG.get_or_init(|| Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: database_url.clone(),
        jwt_secret: "test_secret_key".to_string(),
        environment: "test".to_string(),
        public_rps: 1000,
        api_rps: 1000,
        admin_external_ids: vec![],
        client_origin: None,
    });
    let pool = jobhub_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
    Some(pool)
}

async fn seed_user(pool: &PgPool) -> User {
    let tag = Uuid::new_v4();
    sqlx::query_as::<_, User>(
        "INSERT INTO users (external_id, name, email) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(format!("ext-{}", tag))
    .bind("Seed User")
    .bind(format!("seed_{}@example.com", tag))
    .fetch_one(pool)
    .await
    .expect("seed user")
}

async fn seed_job(pool: &PgPool, creator: &User) -> Uuid {
    let category_id: Uuid = sqlx::query_scalar(
        "INSERT INTO categories (name) VALUES ($1) RETURNING id",
    )
    .bind(format!("Category {}", Uuid::new_v4()))
    .fetch_one(pool)
    .await
    .expect("seed category");

    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO jobs (title, description, company, location, job_type, \
         experience_level, deadline, category_id, created_by, hr_email) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
    )
    .bind("Backend Engineer")
    .bind("A description long enough to satisfy the payload validator elsewhere.")
    .bind("Acme")
    .bind("Remote")
    .bind("remote")
    .bind("senior")
    .bind(Utc::now() + Duration::days(14))
    .bind(category_id)
    .bind(creator.id)
    .bind("hr@acme.example")
    .fetch_one(pool)
    .await
    .expect("seed job")
}

#[tokio::test]
async fn toggling_a_like_twice_returns_to_the_starting_count() {
    let Some(pool) = test_pool().await else { return };
    let user = seed_user(&pool).await;
    let job_id = seed_job(&pool, &user).await;
    let likes = LikeService::new(pool.clone());

    let first = likes.toggle(job_id, user.id).await.expect("toggle on");
    assert!(first.liked);
    assert_eq!(first.likes_count, 1);

    let second = likes.toggle(job_id, user.id).await.expect("toggle off");
    assert!(!second.liked);
    assert_eq!(second.likes_count, 0);
}

#[tokio::test]
async fn second_application_is_rejected_and_count_rises_once() {
    let Some(pool) = test_pool().await else { return };
    let user = seed_user(&pool).await;
    let job_id = seed_job(&pool, &user).await;
    let applications = ApplicationService::new(pool.clone());

    let application = applications.apply(job_id, user.id).await.expect("first apply");
    assert_eq!(application.status, "pending");

    let err = applications
        .apply(job_id, user.id)
        .await
        .expect_err("duplicate apply");
    match err {
        Error::Duplicate(message) => {
            assert_eq!(message, "You have already applied for this job")
        }
        other => panic!("expected duplicate error, got {:?}", other),
    }

    let count: i32 =
        sqlx::query_scalar("SELECT application_count FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_one(&pool)
            .await
            .expect("application count");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn deleting_a_job_twice_decrements_the_category_count_once() {
    let Some(pool) = test_pool().await else { return };
    let user = seed_user(&pool).await;
    let job_id = seed_job(&pool, &user).await;
    let jobs = JobService::new(pool.clone());

    let category_id: Uuid = sqlx::query_scalar("SELECT category_id FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_one(&pool)
        .await
        .expect("category id");
    sqlx::query("UPDATE categories SET job_count = 1 WHERE id = $1")
        .bind(category_id)
        .execute(&pool)
        .await
        .expect("prime job count");

    jobs.soft_delete(job_id, &user).await.expect("first delete");

    let err = jobs
        .soft_delete(job_id, &user)
        .await
        .expect_err("second delete");
    assert!(matches!(err, Error::NotFound(_)));

    let job_count: i32 = sqlx::query_scalar("SELECT job_count FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_one(&pool)
        .await
        .expect("job count");
    assert_eq!(job_count, 0);
}
