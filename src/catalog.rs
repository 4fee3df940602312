//! Built-in sample catalog installed on first browse.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::model::{Category, ImageRef, Product, ProductId, UserId};

struct SampleListing {
    title: &'static str,
    description: &'static str,
    category: Category,
    price: u32,
    image: &'static str,
    username: &'static str,
}

const fn listing(
    title: &'static str,
    description: &'static str,
    category: Category,
    price: u32,
    image: &'static str,
    username: &'static str,
) -> SampleListing {
    SampleListing {
        title,
        description,
        category,
        price,
        image,
        username,
    }
}

#[rustfmt::skip]
const SAMPLE_LISTINGS: [SampleListing; 42] = [
    listing("Smartphone Pro Max", "Latest model smartphone with 256GB storage and amazing camera.", Category::Electronics, 999, "phone1.png", "TechStore"),
    listing("Wireless Headphones", "Noise-cancelling Bluetooth headphones with 30-hour battery life.", Category::Electronics, 199, "headphones1.png", "AudioHub"),
    listing("4K Webcam", "Professional webcam for streaming and video calls.", Category::Electronics, 149, "webcam1.png", "TechGear"),
    listing("Gaming Laptop", "High-performance laptop with RTX graphics card.", Category::Electronics, 1499, "laptop1.png", "GameZone"),
    listing("Smart Watch", "Fitness tracking smartwatch with heart rate monitor.", Category::Electronics, 299, "watch1.png", "FitTech"),
    listing("Tablet 10 inch", "Lightweight tablet perfect for reading and browsing.", Category::Electronics, 399, "tablet1.png", "TabStore"),

    listing("Denim Jacket", "Classic blue denim jacket, unisex style. Size L.", Category::Clothing, 79, "jacket1.png", "FashionHub"),
    listing("Running Shoes", "Comfortable athletic shoes, size 10, barely used.", Category::Clothing, 89, "shoes1.png", "SportStyle"),
    listing("Summer Dress", "Floral print summer dress, size M, perfect condition.", Category::Clothing, 45, "dress1.png", "ChicBoutique"),
    listing("Leather Belt", "Genuine leather belt, brown color, adjustable size.", Category::Clothing, 35, "belt1.png", "Accessories+"),
    listing("Winter Coat", "Warm winter coat with hood, waterproof, size XL.", Category::Clothing, 120, "coat1.png", "WinterWear"),
    listing("Vintage T-Shirt", "Retro band t-shirt, rare find, size L.", Category::Clothing, 25, "tshirt1.png", "VintageFinds"),

    listing("JavaScript Complete Guide", "Comprehensive JavaScript programming book, latest edition.", Category::Books, 45, "book1.png", "BookWorld"),
    listing("Fantasy Novel Collection", "Set of 5 bestselling fantasy novels, mint condition.", Category::Books, 60, "book2.png", "NovelNook"),
    listing("Cookbook Masterclass", "Professional cooking techniques and recipes book.", Category::Books, 35, "book3.png", "CulinaryBooks"),
    listing("Business Strategy", "Modern business management and strategy guide.", Category::Books, 50, "book4.png", "BizBooks"),
    listing("Art History", "Illustrated art history from ancient to modern times.", Category::Books, 70, "book5.png", "ArtLit"),
    listing("Science Encyclopedia", "Complete science reference book for students.", Category::Books, 55, "book6.png", "EduBooks"),

    listing("Office Chair", "Ergonomic office chair with lumbar support, black.", Category::Furniture, 150, "chair1.png", "OfficeDepot"),
    listing("Coffee Table", "Modern glass coffee table with wooden legs.", Category::Furniture, 200, "table1.png", "HomeFurnish"),
    listing("Bookshelf", "5-tier wooden bookshelf, perfect condition.", Category::Furniture, 120, "shelf1.png", "StoragePlus"),
    listing("Desk Lamp", "Adjustable LED desk lamp with USB charging port.", Category::Furniture, 45, "lamp1.png", "LightHouse"),
    listing("Sofa 3-Seater", "Comfortable grey fabric sofa, excellent condition.", Category::Furniture, 450, "sofa1.png", "ComfortZone"),
    listing("Standing Desk", "Height adjustable standing desk with electric motor.", Category::Furniture, 350, "desk1.png", "WorkSpace"),

    listing("Yoga Mat", "Premium non-slip yoga mat with carrying strap.", Category::Sports, 30, "yoga1.png", "FitGear"),
    listing("Tennis Racket", "Professional tennis racket with case, barely used.", Category::Sports, 120, "tennis1.png", "SportsPro"),
    listing("Dumbbells Set", "Adjustable dumbbells set 5-25 lbs with rack.", Category::Sports, 180, "weights1.png", "GymEquip"),
    listing("Basketball", "Official size basketball, indoor/outdoor use.", Category::Sports, 35, "ball1.png", "BallGames"),
    listing("Bicycle Helmet", "Safety certified bike helmet with LED light.", Category::Sports, 55, "helmet1.png", "CycleSafe"),
    listing("Swimming Goggles", "Anti-fog swimming goggles with UV protection.", Category::Sports, 25, "goggles1.png", "SwimStore"),

    listing("LEGO City Set", "Complete LEGO city building set, 500+ pieces.", Category::Toys, 75, "lego1.png", "ToyLand"),
    listing("Remote Control Car", "Fast RC car with rechargeable battery.", Category::Toys, 60, "rccar1.png", "RCWorld"),
    listing("Board Game Collection", "Set of 3 popular family board games.", Category::Toys, 45, "games1.png", "GameNight"),
    listing("Stuffed Bear", "Large teddy bear, super soft, perfect gift.", Category::Toys, 30, "bear1.png", "PlushPals"),
    listing("Puzzle 1000 pieces", "Beautiful landscape puzzle for adults.", Category::Toys, 20, "puzzle1.png", "PuzzleHut"),
    listing("Action Figures Set", "Superhero action figures collection, 6 pieces.", Category::Toys, 40, "figures1.png", "HeroToys"),

    listing("Plant Pot Set", "Ceramic plant pots, set of 3 different sizes.", Category::Other, 35, "pots1.png", "GardenLife"),
    listing("Wall Art Canvas", "Abstract modern art canvas, 24x36 inches.", Category::Other, 80, "art1.png", "ArtGallery"),
    listing("Kitchen Utensils", "Complete kitchen utensil set with holder.", Category::Other, 40, "kitchen1.png", "KitchenPro"),
    listing("Backpack", "Waterproof hiking backpack, 40L capacity.", Category::Other, 65, "backpack1.png", "TravelGear"),
    listing("Guitar Acoustic", "Beginner acoustic guitar with case and picks.", Category::Other, 150, "guitar1.png", "MusicShop"),
    listing("Tool Set", "Complete home tool set in carrying case.", Category::Other, 90, "tools1.png", "ToolMaster"),
];

/// Build the sample catalog: six listings per category, all owned by
/// [`UserId::SAMPLE`], each with a fresh id.
pub fn sample_catalog() -> Vec<Product> {
    let now = Utc::now();
    SAMPLE_LISTINGS
        .iter()
        .map(|l| Product {
            id: ProductId::generate(),
            title: l.title.to_string(),
            description: l.description.to_string(),
            category: l.category,
            price: Decimal::from(l.price),
            image: Some(ImageRef::Url(l.image.to_string())),
            owner_id: UserId::SAMPLE,
            owner_username: l.username.to_string(),
            created_at: now,
            updated_at: None,
        })
        .collect()
}
