//! Curated backup recommendations.
//!
//! Commentary is chosen deterministically from the run context; only the
//! item itself is picked at random (see `FallbackProvider`).
//!
//! Restaurants and places are real venues in [`CATALOG_AREA`], whatever
//! `fetch.region` is set to, so their search links always name that area.
//! Films are location-independent.

use crate::recommendation::{Category, RunContext, Season, TimeOfDay};

/// Area the restaurant and place entries are located in.
pub const CATALOG_AREA: &str = "Charleston SC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttractionKind {
    Historic,
    Park,
    Market,
    Garden,
}

#[derive(Debug)]
pub struct Restaurant {
    pub name: &'static str,
    pub address: &'static str,
    pub rating: &'static str,
    pub cuisine: &'static str,
    pub price_level: &'static str,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct Attraction {
    pub name: &'static str,
    pub address: &'static str,
    pub rating: &'static str,
    pub tags: &'static str,
    pub kind: AttractionKind,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct Film {
    pub title: &'static str,
    pub year: u16,
    pub rating: &'static str,
    pub genre: &'static str,
    pub runtime_minutes: u16,
    pub description: &'static str,
    pub pitch: &'static str,
}

pub static RESTAURANTS: [Restaurant; 5] = [
    Restaurant {
        name: "Husk Restaurant",
        address: "76 Queen St, Charleston, SC 29401",
        rating: "4.4",
        cuisine: "New American, Southern",
        price_level: "$$$",
        description: "Celebrated farm-to-table restaurant showcasing Southern ingredients in an elegant Queen Street setting.",
    },
    Restaurant {
        name: "FIG Restaurant",
        address: "232 Meeting St, Charleston, SC 29401",
        rating: "4.5",
        cuisine: "Mediterranean, American",
        price_level: "$$$",
        description: "Seasonal Mediterranean-inspired cuisine in a cozy downtown atmosphere.",
    },
    Restaurant {
        name: "The Ordinary",
        address: "544 King St, Charleston, SC 29403",
        rating: "4.3",
        cuisine: "Seafood, Raw Bar",
        price_level: "$$$",
        description: "Oyster bar and seafood hall in a beautifully restored bank building.",
    },
    Restaurant {
        name: "Hominy Grill",
        address: "207 Rutledge Ave, Charleston, SC 29403",
        rating: "4.2",
        cuisine: "Southern, Breakfast",
        price_level: "$$",
        description: "Local favourite serving Lowcountry comfort food since 1996.",
    },
    Restaurant {
        name: "Xiao Bao Biscuit",
        address: "224 Rutledge Ave, Charleston, SC 29403",
        rating: "4.1",
        cuisine: "Asian Fusion, Bao",
        price_level: "$$",
        description: "Creative Asian-Southern fusion in a casual, lively room.",
    },
];

pub static ATTRACTIONS: [Attraction; 5] = [
    Attraction {
        name: "Rainbow Row",
        address: "E Bay St, Charleston, SC 29401",
        rating: "4.6",
        tags: "Historic Site, Architecture",
        kind: AttractionKind::Historic,
        description: "A run of thirteen colorful historic houses along East Bay Street, made for strolling and photos.",
    },
    Attraction {
        name: "Waterfront Park",
        address: "Vendue Range, Charleston, SC 29401",
        rating: "4.5",
        tags: "Park, Waterfront",
        kind: AttractionKind::Park,
        description: "Harbor views, the pineapple fountain and shaded walking paths.",
    },
    Attraction {
        name: "Charleston City Market",
        address: "188 Meeting St, Charleston, SC 29401",
        rating: "4.2",
        tags: "Market, Shopping",
        kind: AttractionKind::Market,
        description: "Historic covered market with local artisans and sweetgrass baskets.",
    },
    Attraction {
        name: "The Battery",
        address: "Murray Blvd, Charleston, SC 29401",
        rating: "4.7",
        tags: "Historic Park, Mansions",
        kind: AttractionKind::Historic,
        description: "Waterfront promenade lined with antebellum mansions and harbor cannons.",
    },
    Attraction {
        name: "Magnolia Plantation and Gardens",
        address: "3550 Ashley River Rd, Charleston, SC 29414",
        rating: "4.4",
        tags: "Plantation, Gardens",
        kind: AttractionKind::Garden,
        description: "The oldest public gardens in the country, with azaleas and live oaks.",
    },
];

pub static FILMS: [Film; 5] = [
    Film {
        title: "The Princess Bride",
        year: 1987,
        rating: "8.0",
        genre: "Adventure, Family, Fantasy",
        runtime_minutes: 98,
        description: "A fairy tale adventure with romance, humor and endlessly quotable lines.",
        pitch: "Date night classic",
    },
    Film {
        title: "When Harry Met Sally",
        year: 1989,
        rating: "7.7",
        genre: "Comedy, Romance",
        runtime_minutes: 96,
        description: "The romantic comedy about whether friends can stay just friends.",
        pitch: "Couple movie night staple",
    },
    Film {
        title: "The Grand Budapest Hotel",
        year: 2014,
        rating: "8.1",
        genre: "Adventure, Comedy, Crime",
        runtime_minutes: 99,
        description: "A legendary concierge and his protégé at a famous European hotel.",
        pitch: "Visually stunning and charming",
    },
    Film {
        title: "Paddington",
        year: 2014,
        rating: "7.3",
        genre: "Adventure, Comedy, Family",
        runtime_minutes: 95,
        description: "A polite bear finds his place in London.",
        pitch: "Feel-good and delightful",
    },
    Film {
        title: "Chef",
        year: 2014,
        rating: "7.3",
        genre: "Comedy, Drama",
        runtime_minutes: 114,
        description: "A chef starts a food truck to rediscover cooking and reconnect with his family.",
        pitch: "Inspiring and mouth-watering",
    },
];

/// Number of curated items for `category`.
pub fn len(category: Category) -> usize {
    match category {
        Category::Restaurant => RESTAURANTS.len(),
        Category::PointOfInterest => ATTRACTIONS.len(),
        Category::Movie => FILMS.len(),
    }
}

/// Name of the item at `index`; out-of-range indexes resolve to the first item.
pub fn name(category: Category, index: usize) -> &'static str {
    match category {
        Category::Restaurant => restaurant(index).name,
        Category::PointOfInterest => attraction(index).name,
        Category::Movie => film(index).title,
    }
}

/// Render the item at `index` for `ctx`; out-of-range indexes resolve to the first item.
pub fn render(category: Category, index: usize, ctx: &RunContext) -> String {
    match category {
        Category::Restaurant => render_restaurant(restaurant(index), ctx),
        Category::PointOfInterest => render_attraction(attraction(index), ctx),
        Category::Movie => render_film(film(index), ctx),
    }
}

fn restaurant(index: usize) -> &'static Restaurant {
    RESTAURANTS.get(index).unwrap_or(&RESTAURANTS[0])
}

fn attraction(index: usize) -> &'static Attraction {
    ATTRACTIONS.get(index).unwrap_or(&ATTRACTIONS[0])
}

fn film(index: usize) -> &'static Film {
    FILMS.get(index).unwrap_or(&FILMS[0])
}

fn search_terms(name: &str) -> String {
    url::form_urlencoded::byte_serialize(name.as_bytes()).collect()
}

fn local_search_terms(name: &str) -> String {
    search_terms(&format!("{name} {CATALOG_AREA}"))
}

fn restaurant_notes(ctx: &RunContext) -> String {
    let season = match ctx.season {
        Season::Spring => " Spring weather makes this a great time to explore the dining scene.",
        Season::Summer => " The air-conditioned dining room is a relief from the summer heat.",
        Season::Fall => " Fall is an ideal time to try somewhere new.",
        Season::Winter => " The warm room suits a cozy winter evening.",
    };
    let time = match ctx.time_of_day {
        TimeOfDay::Morning => " Great for a special brunch or late breakfast.",
        TimeOfDay::Afternoon => " Perfect for a leisurely lunch.",
        TimeOfDay::Evening => " Ideal for a dinner out.",
        TimeOfDay::LateNight => "",
    };
    format!("{season}{time}")
}

fn attraction_note(kind: AttractionKind, season: Season) -> &'static str {
    match (season, kind) {
        (Season::Spring, AttractionKind::Park | AttractionKind::Garden) => {
            " Spring is the time to visit, everything is in bloom."
        }
        (Season::Summer, AttractionKind::Historic) => {
            " Go early or late in the day to avoid the summer heat."
        }
        (Season::Fall, _) => " Fall weather makes this perfect for exploring.",
        (Season::Winter, _) => " Even in a mild winter this is a lovely place to visit.",
        _ => "",
    }
}

fn film_note(time_of_day: TimeOfDay) -> &'static str {
    match time_of_day {
        TimeOfDay::Evening => " Perfect for tonight's movie night.",
        TimeOfDay::Afternoon => " Great for an afternoon viewing.",
        _ => " Save this one for your next movie night.",
    }
}

fn render_restaurant(r: &Restaurant, ctx: &RunContext) -> String {
    format!(
        "**{name}** (Backup Recommendation)\n\n\
         {address}\n\
         Rating: {rating}/5 {price}\n\
         Cuisine: {cuisine}\n\n\
         {description}{notes}\n\n\
         https://www.google.com/search?q={query}\n\n\
         Note: this is a curated backup recommendation while live suggestions are unavailable.",
        name = r.name,
        address = r.address,
        rating = r.rating,
        price = r.price_level,
        cuisine = r.cuisine,
        description = r.description,
        notes = restaurant_notes(ctx),
        query = local_search_terms(r.name),
    )
}

fn render_attraction(a: &Attraction, ctx: &RunContext) -> String {
    format!(
        "**{name}** (Backup Recommendation)\n\n\
         {address}\n\
         Rating: {rating}/5\n\
         {tags}\n\n\
         {description}{note}\n\n\
         https://www.google.com/maps/search/{query}\n\n\
         Note: this is a curated backup recommendation while live suggestions are unavailable.",
        name = a.name,
        address = a.address,
        rating = a.rating,
        tags = a.tags,
        description = a.description,
        note = attraction_note(a.kind, ctx.season),
        query = local_search_terms(a.name),
    )
}

fn render_film(f: &Film, ctx: &RunContext) -> String {
    format!(
        "**{title}** ({year}) (Backup Recommendation)\n\n\
         Rating: {rating}/10\n\
         {genre} - {runtime} min\n\n\
         {description}{note}\n\n\
         Why: {pitch}\n\n\
         https://www.imdb.com/find?q={query}\n\n\
         Note: this is a curated backup recommendation while live suggestions are unavailable.",
        title = f.title,
        year = f.year,
        rating = f.rating,
        genre = f.genre,
        runtime = f.runtime_minutes,
        description = f.description,
        note = film_note(ctx.time_of_day),
        pitch = f.pitch,
        query = search_terms(f.title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_items() {
        for category in Category::ALL {
            assert_eq!(len(category), 5);
        }
    }

    #[test]
    fn test_venue_links_name_the_catalog_area() {
        let ctx = RunContext::new(Season::Spring, TimeOfDay::Afternoon);
        let area = search_terms(CATALOG_AREA);

        for category in [Category::Restaurant, Category::PointOfInterest] {
            for index in 0..len(category) {
                let expected = search_terms(&format!("{} {}", name(category, index), CATALOG_AREA));
                let text = render(category, index, &ctx);
                assert!(text.contains(&expected), "{category} #{index}");
                assert!(text.contains(&area));
            }
        }
        assert!(!render(Category::Movie, 0, &ctx).contains(&area));
    }

    #[test]
    fn test_out_of_range_index_uses_first_item() {
        assert_eq!(name(Category::Movie, 99), "The Princess Bride");
        let ctx = RunContext::new(Season::Fall, TimeOfDay::Evening);
        assert!(render(Category::Restaurant, 42, &ctx).starts_with("**Husk Restaurant**"));
    }

    #[test]
    fn test_restaurant_commentary() {
        let ctx = RunContext::new(Season::Summer, TimeOfDay::Morning);
        let text = render(Category::Restaurant, 0, &ctx);
        assert!(text.contains("summer heat"));
        assert!(text.contains("brunch"));
        assert!(text.contains("q=Husk+Restaurant+Charleston+SC"));

        let late = render(Category::Restaurant, 0, &RunContext::new(Season::Winter, TimeOfDay::LateNight));
        assert!(late.contains("winter evening"));
        assert!(!late.contains("brunch") && !late.contains("lunch") && !late.contains("dinner"));
    }

    #[test]
    fn test_attraction_commentary_depends_on_kind() {
        assert_eq!(attraction_note(AttractionKind::Garden, Season::Spring), " Spring is the time to visit, everything is in bloom.");
        assert_eq!(attraction_note(AttractionKind::Historic, Season::Spring), "");
        assert_eq!(attraction_note(AttractionKind::Park, Season::Summer), "");
        assert!(attraction_note(AttractionKind::Historic, Season::Summer).contains("summer heat"));
        assert!(attraction_note(AttractionKind::Market, Season::Fall).contains("Fall"));
        assert!(attraction_note(AttractionKind::Market, Season::Winter).contains("winter"));
    }

    #[test]
    fn test_film_commentary() {
        let ctx = RunContext::new(Season::Spring, TimeOfDay::Evening);
        assert!(render(Category::Movie, 4, &ctx).contains("tonight's movie night"));
        assert_eq!(film_note(TimeOfDay::Morning), film_note(TimeOfDay::LateNight));
    }

    #[test]
    fn test_commentary_is_deterministic() {
        let ctx = RunContext::new(Season::Fall, TimeOfDay::Afternoon);
        for category in Category::ALL {
            for i in 0..len(category) {
                assert_eq!(render(category, i, &ctx), render(category, i, &ctx));
                assert!(render(category, i, &ctx).contains("(Backup Recommendation)"));
            }
        }
    }
}
