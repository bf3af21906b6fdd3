//! Built-in datasets used to seed any slot that durable storage does not hold.

use crate::content_model::{
    ColorTheme, DesignServiceItem, GalleryItem, GeneralSettings, HeroSlide, PricingItem,
    PricingType, PricingUnit, ProductItem, Project, ProjectCategory, ServiceColor, ServiceItem,
    Testimonial,
};

/// Used when the settings record holds no WhatsApp number.
pub const FALLBACK_WHATSAPP: &str = "6281316426495";

fn project(id: u64, title: &str, category: ProjectCategory, image: &str, description: &str) -> Project {
    Project {
        id,
        title: title.to_string(),
        category,
        image: image.to_string(),
        description: description.to_string(),
    }
}

pub fn default_projects() -> Vec<Project> {
    vec![
        project(1, "Kopi Kenangan Senja", ProjectCategory::Food, "https://picsum.photos/id/425/600/400", "Booth Container Minimalis"),
        project(2, "Martabak Sultan", ProjectCategory::Food, "https://picsum.photos/id/429/600/400", "Gerobak Kayu Klasik"),
        project(3, "Laundry Kilat", ProjectCategory::Service, "https://picsum.photos/id/20/600/400", "Counter Meja Resepsionis"),
        project(4, "Fashion Pop-up", ProjectCategory::Pameran, "https://picsum.photos/id/175/600/400", "Booth Pameran Mall"),
        project(5, "Thai Tea Buble", ProjectCategory::Food, "https://picsum.photos/id/292/600/400", "Gerobak Sepeda Motor"),
        project(6, "Gadget Store", ProjectCategory::Retail, "https://picsum.photos/id/3/600/400", "Etalase Aluminium Kaca"),
    ]
}

fn testimonial(id: u64, name: &str, business: &str, content: &str, rating: u8, image: &str) -> Testimonial {
    Testimonial {
        id,
        name: name.to_string(),
        business: business.to_string(),
        content: content.to_string(),
        rating,
        image: image.to_string(),
    }
}

pub fn default_testimonials() -> Vec<Testimonial> {
    vec![
        testimonial(1, "Budi Santoso", "Kebab Turki Mas Budi", "Pengerjaan sangat rapi dan tepat waktu. Mantap!", 5, "https://picsum.photos/id/1005/100/100"),
        testimonial(2, "Siti Aminah", "Es Teh Solo", "Desain dibantu sampai nemu yang pas. Recommended.", 5, "https://picsum.photos/id/1011/100/100"),
        testimonial(3, "Hendro Wijaya", "Barbershop Classic", "Furniture barbershop presisi dan kokoh.", 4, "https://picsum.photos/id/1027/100/100"),
    ]
}

fn service(id: u64, title: &str, description: &str, icon_name: &str, color: ServiceColor) -> ServiceItem {
    ServiceItem {
        id,
        title: title.to_string(),
        description: description.to_string(),
        icon_name: icon_name.to_string(),
        color,
    }
}

pub fn default_services() -> Vec<ServiceItem> {
    vec![
        service(1, "Desain & Perencanaan 3D", "Konsultasi konsep dan visualisasi 3D realistis.", "PenTool", ServiceColor::Blue),
        service(2, "Manufaktur & Fabrikasi", "Konstruksi besi, kayu, dan finishing cat duco.", "Hammer", ServiceColor::Orange),
        service(3, "Instalasi Listrik", "Pemasangan kabel, lampu LED, dan neon box.", "Zap", ServiceColor::Yellow),
        service(4, "Branding Visual", "Stiker vinyl, cutting sticker, dan logo timbul.", "Palette", ServiceColor::Pink),
        service(5, "Pengiriman", "Layanan antar aman dan instalasi di lokasi.", "Truck", ServiceColor::Green),
    ]
}

fn product(id: u64, name: &str, icon_name: &str, kind: &str) -> ProductItem {
    ProductItem {
        id,
        name: name.to_string(),
        kind: kind.to_string(),
        icon_name: icon_name.to_string(),
    }
}

pub fn default_products() -> Vec<ProductItem> {
    vec![
        product(1, "Booth Container", "Store", "Outdoor"),
        product(2, "Gerobak Kayu", "Coffee", "Classic"),
        product(3, "Gerobak Besi", "Settings", "Modern"),
        product(4, "Booth Semi-Permanen", "Store", "Kios"),
        product(5, "Gerobak Motor", "Truck", "Mobile"),
        product(6, "Portable Booth", "ShoppingBag", "Knockdown"),
        product(7, "Interior Cafe", "Coffee", "Furniture"),
        product(8, "Gerobak Alumunium", "Settings", "Ekonomis"),
    ]
}

fn hero_slide(id: u64, image: &str, title: &str, subtitle: &str) -> HeroSlide {
    HeroSlide {
        id,
        image: image.to_string(),
        title: title.to_string(),
        subtitle: subtitle.to_string(),
    }
}

pub fn default_hero_slides() -> Vec<HeroSlide> {
    vec![
        hero_slide(
            1,
            "https://picsum.photos/id/431/1920/1080",
            "Wujudkan Bisnis Impianmu",
            "Desain booth dan gerobak kreatif yang menarik pelanggan sejak pandangan pertama.",
        ),
        hero_slide(
            2,
            "https://picsum.photos/id/225/1920/1080",
            "Material Berkualitas Tinggi",
            "Kami menggunakan kayu, besi, dan aluminium terbaik untuk ketahanan jangka panjang.",
        ),
        hero_slide(
            3,
            "https://picsum.photos/id/445/1920/1080",
            "Siap Kirim Seluruh Indonesia",
            "Layanan pengiriman aman dan terpercaya sampai ke lokasi usaha Anda.",
        ),
    ]
}

fn pricing(id: u64, name: &str, kind: PricingType, price: i64, unit: PricingUnit) -> PricingItem {
    PricingItem {
        id,
        name: name.to_string(),
        kind,
        price,
        unit,
    }
}

pub fn default_pricing_items() -> Vec<PricingItem> {
    vec![
        pricing(1, "Kayu Jati Belanda", PricingType::Material, 1_500_000, PricingUnit::Meter),
        pricing(2, "Besi Hollow + Galvalum", PricingType::Material, 1_800_000, PricingUnit::Meter),
        pricing(3, "Aluminium Kaca", PricingType::Material, 1_200_000, PricingUnit::Meter),
        pricing(4, "Modifikasi Container", PricingType::Material, 2_500_000, PricingUnit::Meter),
        pricing(5, "Atap / Kanopi", PricingType::Addon, 500_000, PricingUnit::Unit),
        pricing(6, "Roda Gerobak", PricingType::Addon, 300_000, PricingUnit::Unit),
        pricing(7, "Neon Box Branding", PricingType::Addon, 850_000, PricingUnit::Unit),
    ]
}

fn gallery(id: u64, title: &str, image: &str) -> GalleryItem {
    GalleryItem {
        id,
        title: title.to_string(),
        image: image.to_string(),
    }
}

pub fn default_gallery_items() -> Vec<GalleryItem> {
    vec![
        gallery(1, "Proses Las", "https://images.unsplash.com/photo-1504917595217-d4dc5ebe6122?auto=format&fit=crop&q=80&w=300&h=200"),
        gallery(2, "Finishing Kayu", "https://images.unsplash.com/photo-1533090481720-856c6e3c1fdc?auto=format&fit=crop&q=80&w=300&h=200"),
        gallery(3, "Instalasi Listrik", "https://images.unsplash.com/photo-1621905251189-08b45d6a269e?auto=format&fit=crop&q=80&w=300&h=200"),
        gallery(4, "Pengecatan", "https://images.unsplash.com/photo-1589939705384-5185137a7f0f?auto=format&fit=crop&q=80&w=300&h=200"),
        gallery(5, "Assembly", "https://images.unsplash.com/photo-1581092921461-eab62e97a783?auto=format&fit=crop&q=80&w=300&h=200"),
    ]
}

pub fn default_design_services() -> Vec<DesignServiceItem> {
    let features = |items: &[&str]| items.iter().map(|f| f.to_string()).collect::<Vec<_>>();

    vec![
        DesignServiceItem {
            id: 1,
            title: "Gerobak Standard".to_string(),
            price: 350_000,
            unit: "/ booth".to_string(),
            description: "Cocok untuk UMKM pemula, booth portable, atau gerobak pinggir jalan.".to_string(),
            features: features(&["Desain 3D Realistis", "2x Revisi Minor", "Format JPG/PNG High Res", "Tampilan Eye-catching"]),
            note: None,
            popular: false,
            icon_name: "Monitor".to_string(),
            color_theme: ColorTheme::Blue,
        },
        DesignServiceItem {
            id: 2,
            title: "Booth Pameran".to_string(),
            price: 600_000,
            unit: "/ desain".to_string(),
            description: "Untuk event, bazaar mall, atau pameran dagang yang butuh impact visual kuat.".to_string(),
            features: features(&["Desain Tematik", "Layouting Area", "Detail Branding", "File Siap Produksi"]),
            note: Some("*Tergantung luas area".to_string()),
            popular: true,
            icon_name: "Layout".to_string(),
            color_theme: ColorTheme::Orange,
        },
        DesignServiceItem {
            id: 3,
            title: "Cafe & Resto".to_string(),
            price: 1_000_000,
            unit: "/ view".to_string(),
            description: "Perancangan interior lengkap untuk coffee shop, bistro, atau restoran permanen.".to_string(),
            features: features(&["Konsep Interior Full", "Layout Furniture", "Detail Pencahayaan", "Material Board"]),
            note: None,
            popular: false,
            icon_name: "PenTool".to_string(),
            color_theme: ColorTheme::Purple,
        },
    ]
}

pub fn default_settings() -> GeneralSettings {
    GeneralSettings {
        about_title: "Mitra Terpercaya Membangun Branding Usaha Anda".to_string(),
        about_description: "KreasiBooth berdiri sejak 2015, berawal dari bengkel las kecil kini menjadi spesialis manufaktur booth dan gerobak modern. Kami memadukan seni desain dengan ketahanan konstruksi untuk menciptakan tempat usaha yang tidak hanya fungsional, tapi juga 'Instagrammable'.".to_string(),
        about_image: "https://picsum.photos/id/1/800/600".to_string(),
        whatsapp: FALLBACK_WHATSAPP.to_string(),
        address: "Jakarta Selatan".to_string(),
        instagram: "@kreasibooth".to_string(),
        email: "admin@kreasibooth.com".to_string(),
        workshop_video_url: "https://assets.mixkit.co/videos/preview/mixkit-man-working-in-a-carpentry-workshop-40502-large.mp4".to_string(),
    }
}
