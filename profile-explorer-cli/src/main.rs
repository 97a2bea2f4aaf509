mod render;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use profile_explorer_lib::map::DETAIL_ZOOM;
use profile_explorer_lib::store::seed_profiles;
use profile_explorer_lib::{
    MapRenderer, MapView, MockProfileStore, OsmLinkRenderer, Profile, ProfileDirectory,
    ProfileForm, StaticGeocoder,
};
use std::time::Duration;
use structopt::StructOpt;
use tokio::runtime::Runtime;
use tracing::Level;

#[derive(Debug, StructOpt)]
#[structopt(name = "profile-explorer-cli", about = "Browse and administer profiles")]
struct Opt {
    /// Artificial delay added to every store call, in milliseconds
    #[structopt(long, default_value = "500")]
    latency_ms: u64,
    /// Start with an empty directory instead of the demo profiles
    #[structopt(long)]
    no_seed: bool,
    #[structopt(long, default_value = "warn")]
    log_level: Level,
}

const MENU: [&str; 9] = [
    "List profiles",
    "Search",
    "View profile",
    "Add profile",
    "Edit profile",
    "Delete profile",
    "Geocode profile",
    "Dismiss error",
    "Quit",
];

struct Session {
    rt: Runtime,
    directory: ProfileDirectory<MockProfileStore>,
    geocoder: StaticGeocoder,
    renderer: OsmLinkRenderer,
    theme: ColorfulTheme,
}

impl Session {
    fn run(&self) -> anyhow::Result<()> {
        loop {
            let state = self.directory.snapshot();
            if let Some(banner) = render::error_banner(&state) {
                println!("{}", banner);
            }

            let choice = Select::with_theme(&self.theme)
                .with_prompt("Profile explorer")
                .items(&MENU)
                .default(0)
                .interact()?;

            match choice {
                0 => println!("{}", render::listing(&state)),
                1 => self.search()?,
                2 => self.view()?,
                3 => self.add()?,
                4 => self.edit()?,
                5 => self.delete()?,
                6 => self.geocode()?,
                7 => self.directory.clear_error(),
                _ => return Ok(()),
            }
        }
    }

    fn search(&self) -> anyhow::Result<()> {
        let query = Input::<String>::with_theme(&self.theme)
            .with_prompt("Search profiles")
            .allow_empty(true)
            .interact_text()?;
        self.directory.search_profiles(&query);
        println!("{}", render::listing(&self.directory.snapshot()));
        Ok(())
    }

    fn view(&self) -> anyhow::Result<()> {
        if let Some(profile) = self.pick("View which profile?")? {
            let view = MapView::for_profile(&profile, DETAIL_ZOOM);
            println!(
                "{}",
                render::profile_details(&profile, &self.renderer.render(&view))
            );
        }
        Ok(())
    }

    fn add(&self) -> anyhow::Result<()> {
        let form = self.fill_form(ProfileForm::default())?;
        match form.into_new_profile() {
            Ok(profile) => {
                if let Some(created) = self.rt.block_on(self.directory.add_profile(profile)) {
                    println!("Created {}", created.name);
                }
            }
            Err(e) => println!("{}", e),
        }
        Ok(())
    }

    fn edit(&self) -> anyhow::Result<()> {
        let Some(profile) = self.pick("Edit which profile?")? else {
            return Ok(());
        };
        let form = self.fill_form(ProfileForm::from_profile(&profile))?;
        match form.into_patch(profile.coordinates) {
            Ok(patch) => {
                if let Some(updated) = self
                    .rt
                    .block_on(self.directory.update_profile(&profile.id, patch))
                {
                    println!("Updated {}", updated.name);
                }
            }
            Err(e) => println!("{}", e),
        }
        Ok(())
    }

    fn delete(&self) -> anyhow::Result<()> {
        let Some(profile) = self.pick("Delete which profile?")? else {
            return Ok(());
        };
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Are you sure you want to delete this profile?")
            .default(false)
            .interact()?;
        if confirmed {
            self.rt.block_on(self.directory.delete_profile(&profile.id));
        }
        Ok(())
    }

    fn geocode(&self) -> anyhow::Result<()> {
        if let Some(profile) = self.pick("Geocode which profile?")? {
            if let Some(located) = self
                .rt
                .block_on(self.directory.geocode_profile(&profile.id, &self.geocoder))
            {
                println!(
                    "{} is at {}, {}",
                    located.name, located.coordinates.lat, located.coordinates.lng
                );
            }
        }
        Ok(())
    }

    /// Picks from the full list, not the search results.
    fn pick(&self, prompt: &str) -> anyhow::Result<Option<Profile>> {
        let profiles = self.directory.profiles();
        if profiles.is_empty() {
            println!("No profiles found");
            return Ok(None);
        }
        let items: Vec<String> = profiles.iter().map(render::profile_line).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact_opt()?;
        Ok(index.map(|i| profiles[i].clone()))
    }

    fn fill_form(&self, initial: ProfileForm) -> anyhow::Result<ProfileForm> {
        Ok(ProfileForm {
            name: self.field("Name", initial.name)?,
            photo: self.field("Photo URL", initial.photo)?,
            description: self.field("Description", initial.description)?,
            address: self.field("Address", initial.address)?,
            contact: self.field("Contact", initial.contact)?,
            interests: self.field("Interests (comma separated)", initial.interests)?,
        })
    }

    fn field(&self, prompt: &str, initial: String) -> anyhow::Result<String> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()?)
    }
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    let collector = tracing_subscriber::fmt()
        .with_max_level(opt.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(collector)?;

    let store = if opt.no_seed {
        MockProfileStore::empty()
    } else {
        MockProfileStore::new()
    }
    .with_latency(Duration::from_millis(opt.latency_ms));

    let rt = Runtime::new()?;
    println!("Loading profiles...");
    let directory = rt.block_on(ProfileDirectory::mount(store));

    let session = Session {
        rt,
        directory,
        geocoder: StaticGeocoder::from_profiles(&seed_profiles()),
        renderer: OsmLinkRenderer::default(),
        theme: ColorfulTheme::default(),
    };
    session.run()
}
