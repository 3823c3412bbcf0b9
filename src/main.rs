use clap::{Args, Parser, Subcommand};
use log::{debug, LevelFilter};
use mystere_meal::catalog::suggest_ingredients;
use mystere_meal::model::ingredient_completion;
use mystere_meal::store::{clear_session, load_session, save_session};
use mystere_meal::{
    ApiClient, AppConfig, AppError, Comment, Credentials, FallbackSource, FileStore,
    LocalCatalog, NewComment, Pantry, Recipe, RecipeDetail, RecipeFilters, SearchQuery, Signup,
    Sourced, User,
};
use std::error::Error;

#[derive(Parser)]
#[command(name = "mystere-meal")]
#[command(about = "Discover recipes from the ingredients you have")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip the backend and search the bundled catalog
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find recipes for the given ingredients (defaults to the pantry)
    Search {
        ingredients: Vec<String>,
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Manage the saved ingredient list
    Pantry {
        #[command(subcommand)]
        action: PantryCommand,
    },

    /// Suggest ingredient names for partial input
    Suggest {
        text: String,
        #[arg(long, default_value_t = 8)]
        limit: usize,
    },

    /// Show a recipe with nutrition, steps and comments
    Show {
        id: String,
        /// Number of ingredients already gathered
        #[arg(long)]
        checked: Option<usize>,
    },

    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Log in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Comment on and rate a recipe
    Comment {
        id: String,
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = NewComment::DEFAULT_RATING)]
        rating: u8,
    },

    /// Add or remove a favorite recipe
    Favorite {
        #[command(subcommand)]
        action: FavoriteCommand,
    },

    /// Show favorites and created recipes
    Profile,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    cuisine: Option<String>,
    #[arg(long)]
    meal_type: Option<String>,
    #[arg(long)]
    difficulty: Option<String>,
    /// Maximum total time in minutes
    #[arg(long)]
    max_time: Option<u32>,
    #[arg(long)]
    min_rating: Option<f64>,
    #[arg(long)]
    vegetarian: bool,
    #[arg(long)]
    vegan: bool,
    #[arg(long)]
    gluten_free: bool,
}

impl From<FilterArgs> for RecipeFilters {
    fn from(args: FilterArgs) -> Self {
        RecipeFilters {
            cuisine: args.cuisine,
            meal_type: args.meal_type,
            difficulty: args.difficulty,
            max_time: args.max_time,
            min_rating: args.min_rating,
            is_vegetarian: args.vegetarian,
            is_vegan: args.vegan,
            is_gluten_free: args.gluten_free,
        }
    }
}

#[derive(Subcommand)]
enum PantryCommand {
    /// Add ingredients
    Add {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Remove an ingredient
    Remove { ingredient: String },
    /// List saved ingredients
    List,
    /// Remove every ingredient
    Clear,
}

#[derive(Subcommand)]
enum FavoriteCommand {
    Add { id: String },
    Remove { id: String },
}

struct App {
    store: FileStore,
    client: ApiClient,
    source: FallbackSource,
    offline: bool,
}

impl App {
    async fn new(config: &AppConfig, offline: bool) -> Result<Self, AppError> {
        let store = FileStore::new(&config.storage.path);
        let token = load_session(&store).await?.and_then(|user| user.token);
        let client = ApiClient::new(&config.api)?.with_token(token);
        let source = if offline {
            FallbackSource::offline(LocalCatalog::default())
        } else {
            FallbackSource::with_primary(
                Box::new(client.clone()),
                LocalCatalog::default(),
                &config.fallback,
            )
        };
        Ok(Self {
            store,
            client,
            source,
            offline,
        })
    }

    fn online_client(&self) -> Result<&ApiClient, AppError> {
        if self.offline {
            return Err(AppError::InvalidInput(
                "This command needs the backend; drop --offline".to_string(),
            ));
        }
        Ok(&self.client)
    }

    async fn current_user(&self) -> Result<User, AppError> {
        load_session(&self.store)
            .await?
            .ok_or(AppError::NotAuthenticated)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = AppConfig::load()?;
    debug!("{:#?}", config);
    let app = App::new(&config, cli.offline).await?;

    run(&app, cli.command).await?;
    Ok(())
}

async fn run(app: &App, command: Command) -> Result<(), AppError> {
    match command {
        Command::Search {
            ingredients,
            filters,
        } => {
            let ingredients = if ingredients.is_empty() {
                Pantry::load(&app.store).await?.ingredients().to_vec()
            } else {
                ingredients
            };
            let query = SearchQuery::new(ingredients, filters.into());
            let result = app.source.search(&query).await?;
            print_results(&result);
        }

        Command::Pantry { action } => {
            let mut pantry = Pantry::load(&app.store).await?;
            match action {
                PantryCommand::Add { ingredients } => {
                    for ingredient in ingredients {
                        let ingredient = ingredient.trim();
                        if ingredient.is_empty() {
                            println!("Skipping blank ingredient");
                        } else if !pantry.add(ingredient).await? {
                            println!("'{}' is already in your pantry", ingredient);
                        }
                    }
                }
                PantryCommand::Remove { ingredient } => {
                    if !pantry.remove(&ingredient).await? {
                        println!("'{}' is not in your pantry", ingredient);
                    }
                }
                PantryCommand::List => {}
                PantryCommand::Clear => pantry.clear().await?,
            }
            print_pantry(pantry.ingredients());
        }

        Command::Suggest { text, limit } => {
            for suggestion in suggest_ingredients(&text, limit) {
                println!("{}", suggestion);
            }
        }

        Command::Show { id, checked } => {
            let detail = app.source.recipe(&id).await?;
            print_detail(&detail, checked);
        }

        Command::Signup {
            name,
            email,
            password,
        } => {
            let user = app
                .online_client()?
                .signup(&Signup {
                    name,
                    email,
                    password,
                })
                .await?;
            save_session(&app.store, &user).await?;
            println!("Welcome, {}!", user.name);
        }

        Command::Login { email, password } => {
            let user = app
                .online_client()?
                .login(&Credentials { email, password })
                .await?;
            save_session(&app.store, &user).await?;
            println!("Hello, {}", user.name);
        }

        Command::Logout => {
            clear_session(&app.store).await?;
            println!("Logged out");
        }

        Command::Comment { id, text, rating } => {
            let user = app.current_user().await?;
            let comment = NewComment::new(text, rating)?;
            app.online_client()?.add_comment(&id, &comment).await?;
            let posted = Comment::posted_now("new", user.name, &comment);
            print_comment(&posted);
        }

        Command::Favorite { action } => {
            let user = app.current_user().await?;
            let client = app.online_client()?;
            match action {
                FavoriteCommand::Add { id } => {
                    client.add_favorite(&user.id, &id).await?;
                    println!("Added {} to favorites", id);
                }
                FavoriteCommand::Remove { id } => {
                    client.remove_favorite(&user.id, &id).await?;
                    println!("Removed {} from favorites", id);
                }
            }
        }

        Command::Profile => {
            let user = app.current_user().await?;
            println!("{} <{}>", user.name, user.email);

            let favorites = app.source.favorites(&user.id).await?;
            println!("\nFavorites{}:", origin_note(&favorites));
            print_recipe_list(&favorites.value);

            let created = app.source.created_recipes(&user.id).await?;
            println!("\nCreated recipes{}:", origin_note(&created));
            print_recipe_list(&created.value);
        }
    }
    Ok(())
}

fn origin_note<T>(result: &Sourced<T>) -> &'static str {
    if result.is_fallback() {
        " (offline catalog)"
    } else {
        ""
    }
}

fn print_results(result: &Sourced<Vec<Recipe>>) {
    let count = result.value.len();
    if count == 0 {
        println!("No recipes found{}", origin_note(result));
        return;
    }
    println!(
        "Found {} recipe{}{}",
        count,
        if count == 1 { "" } else { "s" },
        origin_note(result)
    );
    print_recipe_list(&result.value);
}

fn print_recipe_list(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("  (none)");
    }
    for recipe in recipes {
        println!("  {}", recipe);
    }
}

fn print_pantry(ingredients: &[String]) {
    if ingredients.is_empty() {
        println!("Your pantry is empty");
    } else {
        println!("Pantry: {}", ingredients.join(", "));
    }
}

fn print_detail(detail: &Sourced<RecipeDetail>, checked: Option<usize>) {
    let RecipeDetail { recipe, comments } = &detail.value;

    println!("{}{}", recipe.title, origin_note(detail));
    println!(
        "{} · {} · {} · {} min · {:.1}★",
        recipe.cuisine, recipe.meal_type, recipe.difficulty, recipe.time, recipe.rating
    );
    let mut diets = Vec::new();
    if recipe.vegetarian() {
        diets.push("vegetarian");
    }
    if recipe.vegan() {
        diets.push("vegan");
    }
    if recipe.gluten_free() {
        diets.push("gluten-free");
    }
    if !diets.is_empty() {
        println!("Diet: {}", diets.join(", "));
    }
    if !recipe.tags.is_empty() {
        println!("Tags: {}", recipe.tags.join(", "));
    }

    let n = recipe.nutrition;
    println!(
        "\nNutrition: {} kcal, {}g protein, {}g fat, {}g carbs",
        n.calories, n.protein, n.fat, n.carbs
    );

    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {}", ingredient);
    }
    if let Some(checked) = checked {
        println!(
            "  {}% gathered",
            ingredient_completion(checked, recipe.ingredients.len())
        );
    }

    println!("\nSteps:");
    for (i, step) in recipe.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    println!("\nComments ({}):", comments.len());
    for comment in comments {
        print_comment(comment);
    }
}

fn print_comment(comment: &Comment) {
    println!(
        "  {} {} [{}/5] {}",
        comment.created_at, comment.username, comment.rating, comment.text
    );
}
