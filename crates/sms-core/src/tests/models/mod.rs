mod profile;
mod profile_update;
mod role;
