//! Demo data for a fresh database: default accounts, halls, movies and
//! sessions. Every step is idempotent, so it runs on each startup.

use chrono::{TimeZone, Utc};
use tracing::info;

use crate::{
    models::{NewHall, NewMovie, NewSession, Role},
    repository::Repositories,
    services::user::UserService,
};

const DEFAULT_PASSWORD: &str = "1234";

pub async fn seed_defaults(repos: &Repositories, users: &UserService) -> anyhow::Result<()> {
    // Дефолтные пользователи, если их ещё нет
    for (email, name, role) in [
        ("admin", "Admin", Role::Admin),
        ("cashier", "Cashier", Role::Cashier),
        ("customer", "Guest", Role::Customer),
    ] {
        users
            .ensure_user_with_role(email, DEFAULT_PASSWORD, name, role)
            .await?;
    }

    seed_halls(repos).await?;
    seed_movies(repos).await?;
    seed_sessions(repos).await?;

    // Места для всех залов + VIP только в двух последних рядах
    for hall in repos.halls.get_all().await? {
        repos.seats.ensure_for_hall(&hall).await?;
        repos.seats.fix_vip_for_hall(&hall).await?;
    }

    info!("Default data seeded");
    Ok(())
}

async fn seed_halls(repos: &Repositories) -> sqlx::Result<()> {
    if repos.halls.count().await? > 0 {
        return Ok(());
    }
    for (name, rows, seats_per_row) in [
        ("Зал 1", 8, 12),
        ("Зал 2", 8, 8),
        ("Зал 3", 10, 12),
        ("VIP Зал", 4, 6),
    ] {
        repos
            .halls
            .create(&NewHall { name: name.to_string(), rows, seats_per_row })
            .await?;
    }
    info!("Seeded halls");
    Ok(())
}

async fn seed_movies(repos: &Repositories) -> sqlx::Result<()> {
    if repos.movies.count().await? > 0 {
        return Ok(());
    }

    let catalogue = [
        ("Inception", "A thief who steals corporate secrets through dream-sharing technology.", 148, "Sci-Fi", 8.8),
        ("The Dark Knight", "Batman faces the Joker in Gotham City.", 152, "Action", 9.0),
        ("Interstellar", "Explorers travel through a wormhole in space to ensure humanity's survival.", 169, "Sci-Fi", 8.6),
    ];
    for (title, description, duration, genre, rating) in catalogue {
        repos
            .movies
            .create(&NewMovie {
                title: title.to_string(),
                description: description.to_string(),
                duration,
                genre: genre.to_string(),
                rating,
                poster_url: None,
            })
            .await?;
    }
    info!("Seeded {} movies", catalogue.len());
    Ok(())
}

// Сеансы сидятся независимо от фильмов: база может хранить фильмы без сеансов
async fn seed_sessions(repos: &Repositories) -> sqlx::Result<()> {
    if repos.sessions.count().await? > 0 {
        return Ok(());
    }
    let movie_ids: Vec<i64> = repos.movies.get_all().await?.iter().map(|m| m.id).collect();
    let hall_ids: Vec<i64> = repos.halls.get_all().await?.iter().map(|h| h.id).collect();

    let schedule = session_schedule(&movie_ids, &hall_ids);
    for session in &schedule {
        repos.sessions.create(session).await?;
    }
    info!("Seeded {} sessions", schedule.len());
    Ok(())
}

/// Demo screenings on 2026-02-15 over the first three stored movies and
/// halls. Empty when either list is shorter than three.
pub fn session_schedule(movie_ids: &[i64], hall_ids: &[i64]) -> Vec<NewSession> {
    if movie_ids.len() < 3 || hall_ids.len() < 3 {
        return Vec::new();
    }

    // (фильм, зал, час, минуты, цена): индексы в списках по возрастанию id
    let schedule = [
        (0, 0, 11, 0, 2500.0),
        (0, 1, 14, 30, 2500.0),
        (1, 0, 16, 0, 2200.0),
        (1, 2, 19, 0, 2200.0),
        (2, 1, 12, 0, 2500.0),
        (2, 0, 21, 0, 1900.0),
    ];
    schedule
        .into_iter()
        .map(|(movie, hall, hour, minute, price)| NewSession {
            movie_id: movie_ids[movie],
            hall_id: hall_ids[hall],
            start_time: Utc
                .with_ymd_and_hms(2026, 2, 15, hour, minute, 0)
                .single()
                .unwrap_or_else(Utc::now),
            price,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_uses_stored_ids() {
        let sessions = session_schedule(&[11, 12, 13], &[21, 22, 23, 24]);
        assert_eq!(sessions.len(), 6);
        assert_eq!((sessions[0].movie_id, sessions[0].hall_id), (11, 21));
        assert_eq!((sessions[3].movie_id, sessions[3].hall_id), (12, 23));
        assert_eq!((sessions[5].movie_id, sessions[5].hall_id), (13, 21));
        assert_eq!(sessions[5].price, 1900.0);
        assert_eq!(
            sessions[1].start_time,
            Utc.with_ymd_and_hms(2026, 2, 15, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn schedule_needs_three_movies_and_halls() {
        assert!(session_schedule(&[1, 2], &[1, 2, 3]).is_empty());
        assert!(session_schedule(&[1, 2, 3], &[1]).is_empty());
    }
}
