// used for persistence
use rusqlite::{params, Connection, Error, OptionalExtension, Row, Statement};
use tracing::debug;

use crate::error::{BiblerefError, Result};
use crate::version::BibleVersion;

// Identifiers coming from the chat platform are unsigned 64 bit snowflakes,
// SQLite only has signed integers. The cast keeps every bit.
fn identity(id: u64) -> i64 {
    id as i64
}

fn version_from_row(row: &Row) -> rusqlite::Result<BibleVersion> {
    Ok(BibleVersion {
        command: row.get(0)?,
        name: row.get(1)?,
        abbr: row.get(2)?,
        service: row.get(3)?,
        service_version: row.get(4)?,
        rtl: row.get(5)?,
        books: row.get::<_, i64>(6)? as u64,
    })
}

// ------------- Persistence -------------
/// Keeps the translation catalog and the per-user and per-guild translation
/// preferences.
pub struct Persistor<'db> {
    pub db: &'db Connection,
    // Adders
    add_version: Statement<'db>,
    set_user_pref: Statement<'db>,
    set_guild_pref: Statement<'db>,
    // Getters
    get_version: Statement<'db>,
    get_version_by_abbr: Statement<'db>,
    get_user_pref: Statement<'db>,
    get_guild_pref: Statement<'db>,
    // Listings
    all_versions: Statement<'db>,
}

impl<'db> Persistor<'db> {
    pub fn new<'connection>(connection: &'connection Connection) -> Result<Persistor<'connection>> {
        connection.execute_batch(
            "
            create table if not exists BibleVersion (
                Command text not null,
                Name text not null,
                Abbr text not null,
                Service text not null,
                ServiceVersion text not null,
                Rtl integer not null,
                Books integer not null,
                constraint referenceable_Command primary key (
                    Command
                )
            );
            create table if not exists UserPref (
                User_Identity integer not null,
                Command text not null,
                constraint UserPref_is_BibleVersion foreign key (
                    Command
                ) references BibleVersion(Command),
                constraint referenceable_User_Identity primary key (
                    User_Identity
                )
            );
            create table if not exists GuildPref (
                Guild_Identity integer not null,
                Command text not null,
                constraint GuildPref_is_BibleVersion foreign key (
                    Command
                ) references BibleVersion(Command),
                constraint referenceable_Guild_Identity primary key (
                    Guild_Identity
                )
            );
            ",
        )?;
        Ok(Persistor {
            db: connection,
            add_version: connection.prepare(
                "
                insert into BibleVersion (
                    Command,
                    Name,
                    Abbr,
                    Service,
                    ServiceVersion,
                    Rtl,
                    Books
                ) values (?, ?, ?, ?, ?, ?, ?)
            ",
            )?,
            set_user_pref: connection.prepare(
                "
                insert into UserPref (
                    User_Identity,
                    Command
                ) values (?1, ?2)
                on conflict (User_Identity) do update set Command = excluded.Command
            ",
            )?,
            set_guild_pref: connection.prepare(
                "
                insert into GuildPref (
                    Guild_Identity,
                    Command
                ) values (?1, ?2)
                on conflict (Guild_Identity) do update set Command = excluded.Command
            ",
            )?,
            get_version: connection.prepare(
                "
                select Command, Name, Abbr, Service, ServiceVersion, Rtl, Books
                    from BibleVersion
                    where Command = ?
            ",
            )?,
            get_version_by_abbr: connection.prepare(
                "
                select Command, Name, Abbr, Service, ServiceVersion, Rtl, Books
                    from BibleVersion
                    where lower(Command) = lower(?)
            ",
            )?,
            get_user_pref: connection.prepare(
                "
                select Command
                    from UserPref
                    where User_Identity = ?
            ",
            )?,
            get_guild_pref: connection.prepare(
                "
                select Command
                    from GuildPref
                    where Guild_Identity = ?
            ",
            )?,
            all_versions: connection.prepare(
                "
                select Command, Name, Abbr, Service, ServiceVersion, Rtl, Books
                    from BibleVersion
                    where ?1 is null
                    or substr(lower(Command), 1, length(?1)) = ?1
                    or substr(lower(Abbr), 1, length(?1)) = ?1
                    or instr(lower(Name), ?1) > 0
                    order by Command
                    limit ?2
            ",
            )?,
        })
    }
    /// Stores a translation unless one with the same command already exists.
    /// Returns whether it existed.
    pub fn persist_version(&mut self, version: &BibleVersion) -> Result<bool> {
        let mut existing = false;
        match self
            .get_version
            .query_row(params![&version.command], version_from_row)
        {
            Ok(_) => {
                existing = true;
            }
            Err(Error::QueryReturnedNoRows) => {
                self.add_version.execute(params![
                    &version.command,
                    &version.name,
                    &version.abbr,
                    &version.service,
                    &version.service_version,
                    &version.rtl,
                    version.books as i64
                ])?;
                debug!(command = %version.command, "translation added");
            }
            Err(err) => return Err(err.into()),
        }
        Ok(existing)
    }
    pub fn version_by_command(&mut self, command: &str) -> Result<BibleVersion> {
        match self.get_version.query_row(params![command], version_from_row) {
            Ok(version) => Ok(version),
            Err(Error::QueryReturnedNoRows) => {
                Err(BiblerefError::InvalidVersion(command.to_owned()))
            }
            Err(err) => Err(err.into()),
        }
    }
    /// Case-insensitive lookup of a translation by the code users type.
    pub fn version_by_abbr(&mut self, abbr: &str) -> Result<Option<BibleVersion>> {
        Ok(self
            .get_version_by_abbr
            .query_row(params![abbr], version_from_row)
            .optional()?)
    }
    /// Lists translations ordered by command. A search term keeps those whose
    /// command or abbreviation starts with it, or whose name contains it.
    pub fn versions(
        &mut self,
        search_term: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<BibleVersion>> {
        let term = search_term.map(str::to_lowercase);
        // a negative limit means no limit to SQLite
        let limit = limit.map_or(-1, |l| l as i64);
        let rows = self
            .all_versions
            .query_map(params![term, limit], version_from_row)?;
        let mut versions = Vec::new();
        for version in rows {
            versions.push(version?);
        }
        Ok(versions)
    }
    pub fn set_for_user(&mut self, user_id: u64, command: &str) -> Result<()> {
        let version = self.version_by_command(command)?;
        self.set_user_pref
            .execute(params![identity(user_id), &version.command])?;
        debug!(user_id, command = %version.command, "user preference stored");
        Ok(())
    }
    pub fn set_for_guild(&mut self, guild_id: u64, command: &str) -> Result<()> {
        let version = self.version_by_command(command)?;
        self.set_guild_pref
            .execute(params![identity(guild_id), &version.command])?;
        debug!(guild_id, command = %version.command, "guild preference stored");
        Ok(())
    }
    /// The translation command to use for a user: their own preference, else
    /// the guild's, else `default`.
    pub fn preferred_command(
        &mut self,
        user_id: u64,
        guild_id: Option<u64>,
        default: &str,
    ) -> Result<String> {
        if let Some(command) = self
            .get_user_pref
            .query_row(params![identity(user_id)], |r| r.get::<_, String>(0))
            .optional()?
        {
            return Ok(command);
        }
        if let Some(guild_id) = guild_id {
            if let Some(command) = self
                .get_guild_pref
                .query_row(params![identity(guild_id)], |r| r.get::<_, String>(0))
                .optional()?
            {
                return Ok(command);
            }
        }
        Ok(default.to_owned())
    }
    pub fn preferred_version(
        &mut self,
        user_id: u64,
        guild_id: Option<u64>,
        default: &str,
    ) -> Result<BibleVersion> {
        let command = self.preferred_command(user_id, guild_id, default)?;
        self.version_by_command(&command)
    }
}
