use std::ops::DerefMut;

use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{query, query_as, query_scalar, Executor, PgConnection, PgPool, Postgres, Transaction};

use crate::core::filter::Filter;
use crate::core::models::{
    application::{Application, Insert as ApplicationInsert, ReviewUpdate, Status},
    audit::{AuditEntry, Insert as AuditInsert},
    bos::{BosMember, Insert as BosInsert},
    club_member::{ClubMember, Insert as ClubMemberInsert},
    collaboration::{Collaboration, Insert as CollaborationInsert},
    common::Pagination,
    event::{Event, Insert as EventInsert},
    recruiter::{Insert as RecruiterInsert, Recruiter},
    resource::{Insert as ResourceInsert, Resource},
    team::{Insert as TeamInsert, Team},
};
use crate::core::ports::repository::{
    ApplicationCommon, AuditCommon, BosCommon, ClubMemberCommon, CollaborationCommon, Common, EventCommon, Manager, RecruiterCommon, ResourceCommon, Store, TeamCommon,
    TxStore,
};
use crate::database::models::application::ApplicationRow;
use crate::error::Error;

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

fn page(pagination: Option<Pagination>) -> String {
    pagination.map(|p| p.to_sql_clause()).unwrap_or_default()
}

fn affected(rows: u64) -> Result<(), Error> {
    if rows == 0 {
        return Err(Error::DatabaseError(sqlx::Error::RowNotFound));
    }
    Ok(())
}

/// Postgres store over a pooled connection or an open transaction.
pub struct PgStore<C> {
    conn: C,
}

impl<C> PgStore<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

const APPLICATION_COLUMNS: &str = "id, name, email, phone, batch, roll_number, registration_number, department, interested_tracks, why_join, experience, projects, \
     other_remarks, created, marked_status, marked_remarks, marked_at, marked_by, mod_remarks";

const APPLICATION_WHERE: &str = "
    WHERE ($1::TEXT IS NULL OR ($1 = 'pending' AND marked_status IS NULL) OR marked_status = $1)
        AND ($2::TEXT IS NULL OR name ILIKE $2 OR email ILIKE $2 OR department ILIKE $2 OR roll_number ILIKE $2)";

impl<C> ApplicationCommon for PgStore<C>
where
    C: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: ApplicationInsert) -> Result<String, Error> {
        query(
            "INSERT INTO applications (id, name, email, phone, batch, roll_number, registration_number, department, interested_tracks, why_join, experience, projects, other_remarks, created)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(&data.id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.batch)
        .bind(&data.roll_number)
        .bind(&data.registration_number)
        .bind(&data.department)
        .bind(&data.interested_tracks)
        .bind(&data.why_join)
        .bind(&data.experience)
        .bind(&data.projects)
        .bind(&data.other_remarks)
        .bind(data.created)
        .execute(&mut *self.conn)
        .await?;
        Ok(data.id)
    }

    async fn query(&mut self, status: Option<Status>, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Application>, Error> {
        let stmt = format!("SELECT {} FROM applications {} ORDER BY created DESC{}", APPLICATION_COLUMNS, APPLICATION_WHERE, page(pagination));
        let rows: Vec<ApplicationRow> = query_as(&stmt)
            .bind(status.map(|s| s.as_str()))
            .bind(filter.like_pattern())
            .fetch_all(&mut *self.conn)
            .await?;
        rows.into_iter().map(Application::try_from).collect()
    }

    async fn count(&mut self, status: Option<Status>, filter: &Filter) -> Result<i64, Error> {
        let stmt = format!("SELECT COUNT(*) FROM applications {}", APPLICATION_WHERE);
        let total = query_scalar(&stmt)
            .bind(status.map(|s| s.as_str()))
            .bind(filter.like_pattern())
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(total)
    }

    async fn get(&mut self, id: &str) -> Result<Application, Error> {
        let stmt = format!("SELECT {} FROM applications WHERE id = $1", APPLICATION_COLUMNS);
        let row: ApplicationRow = query_as(&stmt).bind(id).fetch_one(&mut *self.conn).await?;
        row.try_into()
    }

    async fn get_for_update(&mut self, id: &str) -> Result<Application, Error> {
        let stmt = format!("SELECT {} FROM applications WHERE id = $1 FOR UPDATE", APPLICATION_COLUMNS);
        let row: ApplicationRow = query_as(&stmt).bind(id).fetch_one(&mut *self.conn).await?;
        row.try_into()
    }

    async fn update_review(&mut self, id: &str, update: ReviewUpdate) -> Result<(), Error> {
        let m = update.marked_data;
        let res = query("UPDATE applications SET marked_status = $1, marked_remarks = $2, marked_at = $3, marked_by = $4, mod_remarks = $5 WHERE id = $6")
            .bind(m.as_ref().map(|m| m.status.as_str()))
            .bind(m.as_ref().map(|m| m.remarks.as_str()))
            .bind(m.as_ref().map(|m| m.decided_at))
            .bind(m.as_ref().and_then(|m| m.decided_by.as_deref()))
            .bind(update.mod_remarks)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        affected(res.rows_affected())
    }

    async fn exists_email(&mut self, email: &str) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM applications WHERE lower(email) = lower($1))")
            .bind(email)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(exists)
    }
}

impl<C> TeamCommon for PgStore<C>
where
    C: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: TeamInsert) -> Result<String, Error> {
        query("INSERT INTO teams (id, name, description, created) VALUES ($1, $2, $3, $4)")
            .bind(&data.id)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.created)
            .execute(&mut *self.conn)
            .await?;
        Ok(data.id)
    }

    async fn update(&mut self, id: &str, data: TeamInsert) -> Result<(), Error> {
        let res = query("UPDATE teams SET name = $1, description = $2 WHERE id = $3")
            .bind(data.name)
            .bind(data.description)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        affected(res.rows_affected())
    }

    async fn get(&mut self, id: &str) -> Result<Team, Error> {
        let team = query_as("SELECT * FROM teams WHERE id = $1").bind(id).fetch_one(&mut *self.conn).await?;
        Ok(team)
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Team>, Error> {
        let stmt = format!(
            "SELECT * FROM teams WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR description ILIKE $1) ORDER BY created DESC{}",
            page(pagination)
        );
        let teams = query_as(&stmt).bind(filter.like_pattern()).fetch_all(&mut *self.conn).await?;
        Ok(teams)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        let total = query_scalar("SELECT COUNT(*) FROM teams WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR description ILIKE $1)")
            .bind(filter.like_pattern())
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(total)
    }

    async fn delete(&mut self, id: &str) -> Result<(), Error> {
        let res = query("DELETE FROM teams WHERE id = $1").bind(id).execute(&mut *self.conn).await?;
        affected(res.rows_affected())
    }

    async fn exists_name(&mut self, name: &str, except: Option<&str>) -> Result<bool, Error> {
        let exists = query_scalar("SELECT EXISTS(SELECT 1 FROM teams WHERE lower(name) = lower($1) AND ($2::TEXT IS NULL OR id <> $2))")
            .bind(name)
            .bind(except)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(exists)
    }

    async fn exists_all(&mut self, ids: &[String]) -> Result<bool, Error> {
        let mut distinct = ids.to_vec();
        distinct.sort();
        distinct.dedup();
        let found: i64 = query_scalar("SELECT COUNT(*) FROM teams WHERE id = ANY($1)")
            .bind(&distinct)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(found == distinct.len() as i64)
    }
}

const CLUB_MEMBER_WHERE: &str = "
    WHERE ($1::TEXT IS NULL OR bio ILIKE $1 OR title ILIKE $1 OR EXISTS(SELECT 1 FROM unnest(skills) AS s WHERE s ILIKE $1))
        AND ($2::TEXT IS NULL OR status = $2)
        AND ($3::TEXT IS NULL OR $3 = ANY(teams))";

impl<C> ClubMemberCommon for PgStore<C>
where
    C: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: ClubMemberInsert) -> Result<String, Error> {
        query(
            "INSERT INTO club_members (id, name, email, title, bio, skills, status, teams, photo, github, linkedin, created)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(&data.id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.title)
        .bind(&data.bio)
        .bind(&data.skills)
        .bind(&data.status)
        .bind(&data.teams)
        .bind(&data.photo)
        .bind(&data.github)
        .bind(&data.linkedin)
        .bind(data.created)
        .execute(&mut *self.conn)
        .await?;
        Ok(data.id)
    }

    async fn update(&mut self, id: &str, data: ClubMemberInsert) -> Result<(), Error> {
        let res = query(
            "UPDATE club_members SET name = $1, email = $2, title = $3, bio = $4, skills = $5, status = $6, teams = $7, photo = $8, github = $9, linkedin = $10
            WHERE id = $11",
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.title)
        .bind(data.bio)
        .bind(data.skills)
        .bind(data.status)
        .bind(data.teams)
        .bind(data.photo)
        .bind(data.github)
        .bind(data.linkedin)
        .bind(id)
        .execute(&mut *self.conn)
        .await?;
        affected(res.rows_affected())
    }

    async fn get(&mut self, id: &str) -> Result<ClubMember, Error> {
        let member = query_as("SELECT * FROM club_members WHERE id = $1").bind(id).fetch_one(&mut *self.conn).await?;
        Ok(member)
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<ClubMember>, Error> {
        let stmt = format!("SELECT * FROM club_members {} ORDER BY created DESC{}", CLUB_MEMBER_WHERE, page(pagination));
        let members = query_as(&stmt)
            .bind(filter.like_pattern())
            .bind(&filter.status)
            .bind(&filter.team)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(members)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        let stmt = format!("SELECT COUNT(*) FROM club_members {}", CLUB_MEMBER_WHERE);
        let total = query_scalar(&stmt)
            .bind(filter.like_pattern())
            .bind(&filter.status)
            .bind(&filter.team)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(total)
    }

    async fn delete(&mut self, id: &str) -> Result<(), Error> {
        let res = query("DELETE FROM club_members WHERE id = $1").bind(id).execute(&mut *self.conn).await?;
        affected(res.rows_affected())
    }

    async fn set_teams(&mut self, id: &str, teams: &[String]) -> Result<(), Error> {
        let res = query("UPDATE club_members SET teams = $1 WHERE id = $2")
            .bind(teams)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        affected(res.rows_affected())
    }

    async fn remove_team(&mut self, team_id: &str) -> Result<u64, Error> {
        let res = query("UPDATE club_members SET teams = array_remove(teams, $1) WHERE $1 = ANY(teams)")
            .bind(team_id)
            .execute(&mut *self.conn)
            .await?;
        Ok(res.rows_affected())
    }

    async fn count_by_team(&mut self, team_ids: &[String]) -> Result<Vec<(String, i64)>, Error> {
        let counts = query_as(
            "SELECT t, COUNT(DISTINCT id) FROM club_members CROSS JOIN LATERAL unnest(teams) AS t
            WHERE t = ANY($1)
            GROUP BY t",
        )
        .bind(team_ids)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(counts)
    }
}

const EVENT_WHERE: &str = "
    WHERE ($1::TEXT IS NULL OR title ILIKE $1 OR description ILIKE $1 OR location ILIKE $1)
        AND ($2::TEXT IS NULL OR status = $2)
        AND ($3::TEXT IS NULL OR kind = $3)";

impl<C> EventCommon for PgStore<C>
where
    C: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: EventInsert) -> Result<String, Error> {
        query(
            "INSERT INTO events (id, title, description, kind, status, starts_at, location, registration_link, cover_image, created)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&data.id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.kind)
        .bind(&data.status)
        .bind(data.starts_at)
        .bind(&data.location)
        .bind(&data.registration_link)
        .bind(&data.cover_image)
        .bind(data.created)
        .execute(&mut *self.conn)
        .await?;
        Ok(data.id)
    }

    async fn update(&mut self, id: &str, data: EventInsert) -> Result<(), Error> {
        let res = query(
            "UPDATE events SET title = $1, description = $2, kind = $3, status = $4, starts_at = $5, location = $6, registration_link = $7, cover_image = $8
            WHERE id = $9",
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.kind)
        .bind(data.status)
        .bind(data.starts_at)
        .bind(data.location)
        .bind(data.registration_link)
        .bind(data.cover_image)
        .bind(id)
        .execute(&mut *self.conn)
        .await?;
        affected(res.rows_affected())
    }

    async fn get(&mut self, id: &str) -> Result<Event, Error> {
        let event = query_as("SELECT * FROM events WHERE id = $1").bind(id).fetch_one(&mut *self.conn).await?;
        Ok(event)
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Event>, Error> {
        let stmt = format!("SELECT * FROM events {} ORDER BY starts_at DESC{}", EVENT_WHERE, page(pagination));
        let events = query_as(&stmt)
            .bind(filter.like_pattern())
            .bind(&filter.status)
            .bind(&filter.kind)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(events)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        let stmt = format!("SELECT COUNT(*) FROM events {}", EVENT_WHERE);
        let total = query_scalar(&stmt)
            .bind(filter.like_pattern())
            .bind(&filter.status)
            .bind(&filter.kind)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(total)
    }

    async fn delete(&mut self, id: &str) -> Result<(), Error> {
        let res = query("DELETE FROM events WHERE id = $1").bind(id).execute(&mut *self.conn).await?;
        affected(res.rows_affected())
    }
}

const RESOURCE_WHERE: &str = "
    WHERE ($1::TEXT IS NULL OR title ILIKE $1 OR description ILIKE $1 OR EXISTS(SELECT 1 FROM unnest(tags) AS t WHERE t ILIKE $1))
        AND ($2::TEXT IS NULL OR kind = $2)";

impl<C> ResourceCommon for PgStore<C>
where
    C: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: ResourceInsert) -> Result<String, Error> {
        query("INSERT INTO resources (id, title, description, url, kind, tags, created) VALUES ($1, $2, $3, $4, $5, $6, $7)")
            .bind(&data.id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(&data.url)
            .bind(&data.kind)
            .bind(&data.tags)
            .bind(data.created)
            .execute(&mut *self.conn)
            .await?;
        Ok(data.id)
    }

    async fn update(&mut self, id: &str, data: ResourceInsert) -> Result<(), Error> {
        let res = query("UPDATE resources SET title = $1, description = $2, url = $3, kind = $4, tags = $5 WHERE id = $6")
            .bind(data.title)
            .bind(data.description)
            .bind(data.url)
            .bind(data.kind)
            .bind(data.tags)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        affected(res.rows_affected())
    }

    async fn get(&mut self, id: &str) -> Result<Resource, Error> {
        let resource = query_as("SELECT * FROM resources WHERE id = $1").bind(id).fetch_one(&mut *self.conn).await?;
        Ok(resource)
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Resource>, Error> {
        let stmt = format!("SELECT * FROM resources {} ORDER BY created DESC{}", RESOURCE_WHERE, page(pagination));
        let resources = query_as(&stmt)
            .bind(filter.like_pattern())
            .bind(&filter.kind)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(resources)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        let stmt = format!("SELECT COUNT(*) FROM resources {}", RESOURCE_WHERE);
        let total = query_scalar(&stmt)
            .bind(filter.like_pattern())
            .bind(&filter.kind)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(total)
    }

    async fn delete(&mut self, id: &str) -> Result<(), Error> {
        let res = query("DELETE FROM resources WHERE id = $1").bind(id).execute(&mut *self.conn).await?;
        affected(res.rows_affected())
    }
}

const BOS_WHERE: &str = "WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR position ILIKE $1 OR department ILIKE $1 OR batch ILIKE $1)";

impl<C> BosCommon for PgStore<C>
where
    C: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: BosInsert) -> Result<String, Error> {
        query(
            "INSERT INTO bos_members (id, name, email, position, batch, department, photo, socials, achievements, created)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&data.id)
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.position)
        .bind(&data.batch)
        .bind(&data.department)
        .bind(&data.photo)
        .bind(&data.socials)
        .bind(&data.achievements)
        .bind(data.created)
        .execute(&mut *self.conn)
        .await?;
        Ok(data.id)
    }

    async fn update(&mut self, id: &str, data: BosInsert) -> Result<(), Error> {
        let res = query(
            "UPDATE bos_members SET name = $1, email = $2, position = $3, batch = $4, department = $5, photo = $6, socials = $7, achievements = $8
            WHERE id = $9",
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.position)
        .bind(data.batch)
        .bind(data.department)
        .bind(data.photo)
        .bind(data.socials)
        .bind(data.achievements)
        .bind(id)
        .execute(&mut *self.conn)
        .await?;
        affected(res.rows_affected())
    }

    async fn get(&mut self, id: &str) -> Result<BosMember, Error> {
        let member = query_as("SELECT * FROM bos_members WHERE id = $1").bind(id).fetch_one(&mut *self.conn).await?;
        Ok(member)
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<BosMember>, Error> {
        let stmt = format!("SELECT * FROM bos_members {} ORDER BY created DESC{}", BOS_WHERE, page(pagination));
        let members = query_as(&stmt).bind(filter.like_pattern()).fetch_all(&mut *self.conn).await?;
        Ok(members)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        let stmt = format!("SELECT COUNT(*) FROM bos_members {}", BOS_WHERE);
        let total = query_scalar(&stmt).bind(filter.like_pattern()).fetch_one(&mut *self.conn).await?;
        Ok(total)
    }

    async fn delete(&mut self, id: &str) -> Result<(), Error> {
        let res = query("DELETE FROM bos_members WHERE id = $1").bind(id).execute(&mut *self.conn).await?;
        affected(res.rows_affected())
    }
}

const COLLABORATION_WHERE: &str = "WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR organization ILIKE $1 OR message ILIKE $1)";

impl<C> CollaborationCommon for PgStore<C>
where
    C: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: CollaborationInsert) -> Result<String, Error> {
        query("INSERT INTO collaborations (id, name, email, organization, message, created) VALUES ($1, $2, $3, $4, $5, $6)")
            .bind(&data.id)
            .bind(&data.name)
            .bind(&data.email)
            .bind(&data.organization)
            .bind(&data.message)
            .bind(data.created)
            .execute(&mut *self.conn)
            .await?;
        Ok(data.id)
    }

    async fn query(&mut self, filter: &Filter, pagination: Option<Pagination>) -> Result<Vec<Collaboration>, Error> {
        let stmt = format!("SELECT * FROM collaborations {} ORDER BY created DESC{}", COLLABORATION_WHERE, page(pagination));
        let rows = query_as(&stmt).bind(filter.like_pattern()).fetch_all(&mut *self.conn).await?;
        Ok(rows)
    }

    async fn count(&mut self, filter: &Filter) -> Result<i64, Error> {
        let stmt = format!("SELECT COUNT(*) FROM collaborations {}", COLLABORATION_WHERE);
        let total = query_scalar(&stmt).bind(filter.like_pattern()).fetch_one(&mut *self.conn).await?;
        Ok(total)
    }
}

impl<C> RecruiterCommon for PgStore<C>
where
    C: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: RecruiterInsert) -> Result<String, Error> {
        query("INSERT INTO recruiters (id, username, assignee, password, salt, exec, team_mgmt, created) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)")
            .bind(&data.id)
            .bind(&data.username)
            .bind(&data.assignee)
            .bind(&data.password)
            .bind(&data.salt)
            .bind(data.exec)
            .bind(data.team_mgmt)
            .bind(data.created)
            .execute(&mut *self.conn)
            .await?;
        Ok(data.id)
    }

    async fn get(&mut self, id: &str) -> Result<Recruiter, Error> {
        let recruiter = query_as("SELECT * FROM recruiters WHERE id = $1").bind(id).fetch_one(&mut *self.conn).await?;
        Ok(recruiter)
    }

    async fn get_by_username(&mut self, username: &str) -> Result<Option<Recruiter>, Error> {
        let recruiter = query_as("SELECT * FROM recruiters WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(recruiter)
    }
}

impl<C> AuditCommon for PgStore<C>
where
    C: DerefMut<Target = PgConnection>,
{
    async fn insert(&mut self, data: AuditInsert) -> Result<String, Error> {
        query("INSERT INTO audit_logs (id, actor, action, resource_type, resource_id, details, created) VALUES ($1, $2, $3, $4, $5, $6, $7)")
            .bind(&data.id)
            .bind(&data.actor)
            .bind(&data.action)
            .bind(&data.resource_type)
            .bind(&data.resource_id)
            .bind(&data.details)
            .bind(data.created)
            .execute(&mut *self.conn)
            .await?;
        Ok(data.id)
    }

    async fn query(&mut self, pagination: Option<Pagination>) -> Result<Vec<AuditEntry>, Error> {
        let stmt = format!("SELECT * FROM audit_logs ORDER BY created DESC{}", page(pagination));
        let entries = query_as(&stmt).fetch_all(&mut *self.conn).await?;
        Ok(entries)
    }

    async fn count(&mut self) -> Result<i64, Error> {
        let total = query_scalar("SELECT COUNT(*) FROM audit_logs").fetch_one(&mut *self.conn).await?;
        Ok(total)
    }
}

impl<C> Common for PgStore<C> where C: DerefMut<Target = PgConnection> {}
impl Store for PgStore<PoolConnection<Postgres>> {}
impl Store for PgStore<Transaction<'static, Postgres>> {}

impl TxStore for PgStore<Transaction<'static, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.conn.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.conn.rollback().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgManager {
    pool: PgPool,
}

impl PgManager {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        Ok(Self { pool })
    }

    /// Creates any missing tables; every statement is idempotent.
    pub async fn init_schema(&self) -> Result<(), Error> {
        self.pool.execute(SCHEMA).await?;
        Ok(())
    }
}

impl Manager for PgManager {
    type Store = PgStore<PoolConnection<Postgres>>;
    type TxStore = PgStore<Transaction<'static, Postgres>>;

    async fn db(&self) -> Result<Self::Store, Error> {
        let conn = self.pool.acquire().await?;
        Ok(PgStore::new(conn))
    }

    async fn tx(&self) -> Result<Self::TxStore, Error> {
        let tx = self.pool.begin().await?;
        Ok(PgStore::new(tx))
    }
}
