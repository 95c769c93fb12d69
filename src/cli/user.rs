use crate::store::Store;

use super::{Context, print_json};

pub fn run_user_add(ctx: &Context, name: String) -> anyhow::Result<()> {
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        anyhow::bail!("Username cannot be empty or contain whitespace");
    }

    if ctx.store.get_user_by_name(name)?.is_some() {
        anyhow::bail!("User '{}' already exists", name);
    }

    let user = ctx.store.create_user(name)?;

    if ctx.json {
        return print_json(&user);
    }
    println!("Created user '{}' (id {})", user.name, user.id);
    Ok(())
}

pub fn run_user_get(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let user = ctx
        .store
        .get_user(id)?
        .ok_or_else(|| anyhow::anyhow!("User {} not found", id))?;

    if ctx.json {
        return print_json(&user);
    }
    println!("{} (id {})", user.name, user.id);
    println!("  stars:   {}", user.num_stars);
    println!("  created: {}", user.created().format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}
