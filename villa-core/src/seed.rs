use crate::errors::ErrorKind;
use crate::types::{BlogItem, CategoryItem, HeroSlide, LocationItem, Property, PropertyType};
use crate::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const BRAND: &str = "99Villa";

const FALLBACK_IMAGE: &str = "https://picsum.photos/seed/new/600/400";

/// Static catalog the whole site is built from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub hero_slides: Vec<HeroSlide>,
    pub highlighted: Vec<Property>,
    pub popular: Vec<Property>,
    pub locations: Vec<LocationItem>,
    pub categories: Vec<CategoryItem>,
    pub blogs: Vec<BlogItem>,
}

impl Catalog {
    pub fn seed() -> Self {
        Catalog {
            hero_slides: hero_slides(),
            highlighted: highlighted_projects(),
            popular: popular_properties(),
            locations: top_locations(),
            categories: dream_categories(),
            blogs: blogs(),
        }
    }

    /// Highlighted projects followed by popular properties; this is the
    /// "Featured" order of the listing page.
    pub fn all_properties(&self) -> Vec<Property> {
        self.highlighted
            .iter()
            .chain(self.popular.iter())
            .cloned()
            .collect()
    }

    pub fn blog(&self, id: &str) -> Option<&BlogItem> {
        self.blogs.iter().find(|blog| blog.id == id)
    }

    /// Parses an exported catalog. Property ids must be unique across the
    /// highlighted and popular lists.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.check_unique_ids()?;
        Ok(catalog)
    }

    fn check_unique_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for property in self.highlighted.iter().chain(self.popular.iter()) {
            if !seen.insert(property.id.as_str()) {
                return Err(ErrorKind::DuplicateProperty(property.id.clone()).into());
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::seed()
    }
}

pub fn fallback_image() -> &'static str {
    FALLBACK_IMAGE
}

fn picsum(seed: &str, width: u32, height: u32) -> String {
    format!("https://picsum.photos/seed/{seed}/{width}/{height}")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn hero_slides() -> Vec<HeroSlide> {
    [
        (1, "hero1", "Your Second Home, IN THE HEART OF NATURE", "Welcome to 99Villa"),
        (2, "hero2", "Invest in Your Future", "Prime Locations Available"),
        (3, "hero3", "Luxury Living Defined", "Experience the Best"),
    ]
    .into_iter()
    .map(|(id, seed, title, subtitle)| HeroSlide {
        id,
        image: picsum(seed, 1600, 600),
        title: title.to_string(),
        subtitle: subtitle.to_string(),
    })
    .collect()
}

fn highlighted_projects() -> Vec<Property> {
    let mut h1 = Property::new(
        "h1",
        "Luxury Villa/Bungalow",
        "Karjat, Navi Mumbai",
        "₹ 75 L",
        PropertyType::Villa,
        &picsum("villa1", 600, 400),
    );
    h1.images = vec![
        picsum("villa1", 800, 600),
        picsum("villa1_int", 800, 600),
        picsum("villa1_pool", 800, 600),
        picsum("villa1_garden", 800, 600),
    ];
    h1.description = Some(
        "A beautiful luxury villa nestled in the hills of Karjat. Experience serenity and luxury \
         combined with modern architecture and lush green surroundings."
            .to_string(),
    );
    h1.amenities = strings(&["Pool", "Garden", "Security", "Clubhouse", "Jogging Track"]);
    h1.bed_bath = Some("3 BHK".to_string());
    h1.video_url = Some("https://www.youtube.com/embed/lxO-6rlihSg".to_string());

    let mut h2 = Property::new(
        "h2",
        "Modern Villa/Bungalow",
        "Karjat, Navi Mumbai",
        "₹ 45 L",
        PropertyType::Bungalow,
        &picsum("villa2", 600, 400),
    );
    h2.images = vec![picsum("villa2", 800, 600), picsum("villa2_bed", 800, 600)];
    h2.description = Some("Affordable luxury with modern amenities.".to_string());
    h2.amenities = strings(&["Clubhouse", "Gym"]);
    h2.bed_bath = Some("2 BHK".to_string());

    let mut h3 = Property::new(
        "h3",
        "Cozy Bungalow",
        "Khopoli Pali Road, Navi Mumbai",
        "₹ 25 L",
        PropertyType::Bungalow,
        &picsum("villa3", 600, 400),
    );
    h3.description = Some("Perfect weekend gateway near the city.".to_string());
    h3.amenities = strings(&["Garden", "Parking"]);
    h3.bed_bath = Some("1 BHK".to_string());

    let mut h4 = Property::new(
        "h4",
        "Hillside Retreat",
        "Lonavala",
        "₹ 1.2 Cr",
        PropertyType::Villa,
        &picsum("villa4", 600, 400),
    );
    h4.description = Some("High-end villa with panoramic views.".to_string());
    h4.amenities = strings(&["Pool", "Spa", "Concierge"]);
    h4.bed_bath = Some("4 BHK".to_string());

    vec![h1, h2, h3, h4]
}

fn popular_properties() -> Vec<Property> {
    [
        ("p1", "Residential Plot", "Alibaug, Navi Mumbai", "₹ 9 L", PropertyType::Plot, "land1"),
        ("p2", "Villa/Bungalow", "Khopoli Pali Road", "₹ 25 L", PropertyType::Villa, "villa5"),
        ("p3", "Residential Plot", "Khopoli Pali Road", "₹ 15 L", PropertyType::Plot, "land2"),
        ("p4", "Residential Plot", "Navi Mumbai", "₹ 9 L", PropertyType::Plot, "land3"),
    ]
    .into_iter()
    .map(|(id, title, location, price, property_type, seed)| {
        let mut property = Property::new(
            id,
            title,
            location,
            price,
            property_type,
            &picsum(seed, 600, 400),
        );
        property.size = Some("1089 sqft".to_string());
        property.status = Some("Ready Move".to_string());
        property
    })
    .collect()
}

fn top_locations() -> Vec<LocationItem> {
    [
        ("l1", "Uran Plots", "loc1"),
        ("l2", "Chirle Plots", "loc2"),
        ("l3", "Ranjanpada Plots", "loc3"),
        ("l4", "Vindhane Plots", "loc4"),
    ]
    .into_iter()
    .map(|(id, name, seed)| LocationItem {
        id: id.to_string(),
        name: name.to_string(),
        image: picsum(seed, 300, 300),
    })
    .collect()
}

fn dream_categories() -> Vec<CategoryItem> {
    [
        (
            "c1",
            "Plots for Petrolpump",
            "The biggest is for the land to be convenient for either travelers or local population.",
            "gas",
        ),
        (
            "c2",
            "Investment Plots",
            "Your future prospects look great when you buy investment plots with regards to profitable returns.",
            "invest",
        ),
        (
            "c3",
            "Commercial Plots",
            "Contact us for best returns on plots invested near junctions, stations, highways.",
            "comm",
        ),
        (
            "c4",
            "Residential Plots",
            "In case you are a developer looking for land to expand your business.",
            "res",
        ),
    ]
    .into_iter()
    .map(|(id, title, description, seed)| CategoryItem {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image: picsum(seed, 400, 300),
        icon: None,
    })
    .collect()
}

fn blogs() -> Vec<BlogItem> {
    vec![
        BlogItem {
            id: "b1".to_string(),
            title: "Mahamumbai - Your Future Investment Opportunity".to_string(),
            excerpt: "MAHAMUMBAI enjoys high property supply, demand is growing due to construction..."
                .to_string(),
            image: picsum("bridge", 500, 300),
            date: "Oct 12, 2023".to_string(),
            content: Some(
                "<p>The concept of \"Mahamumbai\" or the Third Mumbai is gaining rapid traction among \
                 investors and homebuyers alike. With the upcoming Atal Setu (MTHL) bridge, connectivity \
                 between Mumbai and Navi Mumbai has improved drastically, reducing travel time significantly.</p>\
                 <h3>Why Invest Now?</h3>\
                 <p>Property prices in this region are still competitive compared to Mumbai and Thane. \
                 The proposed airport and metro connectivity are set to boost infrastructure development, \
                 making it a hotspot for real estate appreciation.</p>\
                 <p>Whether you are looking for residential plots or commercial land, Mahamumbai offers a \
                 plethora of options that promise high returns in the next 5-10 years.</p>"
                    .to_string(),
            ),
        },
        BlogItem {
            id: "b2".to_string(),
            title: "Why Thane is good for investment in Plots?".to_string(),
            excerpt: "Thane is an emerging cosmopolitan city in the Mumbai Metropolitan Area..."
                .to_string(),
            image: picsum("city", 500, 300),
            date: "Sep 28, 2023".to_string(),
            content: Some(
                "<p>Thane has evolved from a satellite town to a robust cosmopolitan city. It boasts \
                 excellent connectivity to Mumbai via the Eastern Express Highway and the suburban \
                 railway network.</p>\
                 <h3>Greenery and Infrastructure</h3>\
                 <p>Unlike the concrete jungle of Mumbai, Thane still retains much of its greenery, \
                 offering a better quality of life. The municipal corporation has been proactive in \
                 developing wide roads, parks, and civic amenities.</p>"
                    .to_string(),
            ),
        },
        BlogItem {
            id: "b3".to_string(),
            title: "The Dos and Don'ts of Buying Land".to_string(),
            excerpt: "Buying land is a dream for many people. Purchasing land is also one of the..."
                .to_string(),
            image: picsum("grass", 500, 300),
            date: "Aug 15, 2023".to_string(),
            content: Some(
                "<p>Investing in land is lucrative but comes with its own set of risks. Here is a \
                 checklist to ensure a safe transaction.</p>\
                 <ul>\
                 <li><strong>Do:</strong> Check the title deed thoroughly.</li>\
                 <li><strong>Do:</strong> Verify the land use zone (Residential/Commercial/Agricultural).</li>\
                 <li><strong>Don't:</strong> Rush into a deal without a physical site visit.</li>\
                 <li><strong>Don't:</strong> Forget to check for pending litigations or mortgages.</li>\
                 </ul>"
                    .to_string(),
            ),
        },
    ]
}
